//! File-backed JSONL journal with SHA-256 hash chain for crash recovery.
//!
//! The file format is line-delimited JSON (`.jsonl`):
//! - Line 1: header with `format_version`, `build_id`, `seed` and the full
//!   game configuration.
//! - Lines 2+: one record per accepted turn, each carrying a SHA-256 hash
//!   chain (`prev_sha256_hex`, `sha256_hex`) for corruption detection.
//!
//! Writing flushes each record immediately so the file survives crashes.
//! Loading validates every line's JSON shape and SHA-256 chain, stopping
//! at the first invalid or incomplete line.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::GameConfiguration;
use crate::journal::{InputJournal, InputRecord, JOURNAL_FORMAT_VERSION};
use crate::types::Command;

/// First line of the JSONL journal file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct FileHeader {
    format_version: u16,
    build_id: String,
    seed: u64,
    config: GameConfiguration,
}

/// Fields used to compute the canonical SHA-256 for a record.
/// Serialized to JSON as the hash input (concatenated with `prev_sha256_hex`).
#[derive(Serialize)]
struct RecordBody<'a> {
    seq: u64,
    turn: u64,
    command: &'a Command,
}

/// Full record line written to the JSONL file.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileRecord {
    seq: u64,
    turn: u64,
    command: Command,
    prev_sha256_hex: String,
    sha256_hex: String,
}

/// The initial previous-hash used for the first record in a chain.
pub const INITIAL_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Compute `hex(SHA-256(body_json || prev_sha256_hex))`.
fn compute_record_sha256(body_json: &str, prev_sha256_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body_json.as_bytes());
    hasher.update(prev_sha256_hex.as_bytes());
    let result = hasher.finalize();
    format!("{result:064x}")
}

/// Appends accepted turns to a JSONL file with a SHA-256 hash chain.
pub struct JournalWriter {
    writer: BufWriter<File>,
    last_sha256_hex: String,
    next_seq: u64,
}

impl JournalWriter {
    /// Create a new journal file, writing the header line immediately.
    pub fn create(
        path: &Path,
        seed: u64,
        build_id: &str,
        config: &GameConfiguration,
    ) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = FileHeader {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: build_id.to_string(),
            seed,
            config: config.clone(),
        };
        let header_json = serde_json::to_string(&header).map_err(io::Error::other)?;
        writeln!(writer, "{header_json}")?;
        writer.flush()?;

        Ok(Self { writer, last_sha256_hex: INITIAL_HASH.to_string(), next_seq: 0 })
    }

    /// Resume appending to an existing journal after loading it.
    /// `last_sha256_hex` and `next_seq` come from `LoadedJournal`.
    pub fn resume(path: &Path, last_sha256_hex: String, next_seq: u64) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer, last_sha256_hex, next_seq })
    }

    /// Append one accepted turn and flush immediately.
    pub fn append(&mut self, turn: u64, command: &Command) -> io::Result<()> {
        let body = RecordBody { seq: self.next_seq, turn, command };
        let body_json = serde_json::to_string(&body).map_err(io::Error::other)?;
        let sha256_hex = compute_record_sha256(&body_json, &self.last_sha256_hex);

        let record = FileRecord {
            seq: self.next_seq,
            turn,
            command: command.clone(),
            prev_sha256_hex: self.last_sha256_hex.clone(),
            sha256_hex: sha256_hex.clone(),
        };

        let record_json = serde_json::to_string(&record).map_err(io::Error::other)?;
        writeln!(self.writer, "{record_json}")?;
        self.writer.flush()?;

        self.last_sha256_hex = sha256_hex;
        self.next_seq += 1;

        Ok(())
    }
}

/// Successfully loaded journal with metadata needed for resuming appends.
#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: InputJournal,
    /// SHA-256 hex of the last valid record (or the initial hash if empty).
    pub last_sha256_hex: String,
    /// Sequence number for the next record to be appended.
    pub next_seq: u64,
}

/// Describes why a journal file could not be fully loaded.
#[derive(Debug, thiserror::Error)]
pub enum JournalLoadError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("journal file is empty")]
    EmptyFile,
    #[error("invalid journal header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },
    /// A record line could not be parsed or its fields are inconsistent.
    #[error("invalid journal record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    /// For example, the file ended without a trailing newline.
    #[error("incomplete journal line at line {line}")]
    IncompleteLine { line: usize },
    /// Prev hash mismatch, or the recomputed hash does not match the stored one.
    #[error("SHA-256 hash chain broken at line {line}")]
    HashChainBroken { line: usize },
}

/// Load and validate a JSONL journal file.
///
/// Returns the in-memory journal plus metadata for resuming appends.
/// Stops at the first invalid, incomplete, or hash-broken line and returns
/// an error describing the problem.
pub fn load_journal_from_file(path: &Path) -> Result<LoadedJournal, JournalLoadError> {
    match recover_journal_from_file(path)? {
        (loaded, None) => Ok(loaded),
        (_, Some(error)) => Err(error),
    }
}

/// Like `load_journal_from_file`, but keeps the valid prefix when a record
/// line is bad. Only an unreadable file or header is an outright error.
pub fn recover_journal_from_file(
    path: &Path,
) -> Result<(LoadedJournal, Option<JournalLoadError>), JournalLoadError> {
    let content = fs::read_to_string(path)?;
    if content.is_empty() {
        return Err(JournalLoadError::EmptyFile);
    }
    let has_trailing_newline = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Err(JournalLoadError::EmptyFile);
    }
    if lines.len() == 1 && !has_trailing_newline {
        return Err(JournalLoadError::IncompleteLine { line: 1 });
    }

    let header: FileHeader = serde_json::from_str(lines[0])
        .map_err(|e| JournalLoadError::InvalidHeader { line: 1, message: e.to_string() })?;

    let mut loaded = LoadedJournal {
        journal: InputJournal {
            format_version: header.format_version,
            build_id: header.build_id,
            seed: header.seed,
            config: header.config,
            inputs: Vec::new(),
        },
        last_sha256_hex: INITIAL_HASH.to_string(),
        next_seq: 0,
    };

    for (line_index, line) in lines.iter().enumerate().skip(1) {
        let line_number = line_index + 1;
        if line_number == lines.len() && !has_trailing_newline {
            return Ok((loaded, Some(JournalLoadError::IncompleteLine { line: line_number })));
        }
        match check_record(line, line_number, &loaded) {
            Ok(record) => {
                let input = InputRecord { turn: record.turn, command: record.command };
                loaded.journal.inputs.push(input);
                loaded.last_sha256_hex = record.sha256_hex;
                loaded.next_seq += 1;
            }
            Err(error) => return Ok((loaded, Some(error))),
        }
    }

    Ok((loaded, None))
}

fn check_record(
    line: &str,
    line_number: usize,
    loaded: &LoadedJournal,
) -> Result<FileRecord, JournalLoadError> {
    if line.is_empty() {
        return Err(JournalLoadError::InvalidRecord {
            line: line_number,
            message: "empty line".to_string(),
        });
    }

    let record: FileRecord = serde_json::from_str(line).map_err(|e| {
        JournalLoadError::InvalidRecord { line: line_number, message: e.to_string() }
    })?;

    if record.seq != loaded.next_seq {
        return Err(JournalLoadError::InvalidRecord {
            line: line_number,
            message: format!("expected seq {}, found {}", loaded.next_seq, record.seq),
        });
    }

    if record.prev_sha256_hex != loaded.last_sha256_hex {
        return Err(JournalLoadError::HashChainBroken { line: line_number });
    }

    let body = RecordBody { seq: record.seq, turn: record.turn, command: &record.command };
    let body_json = serde_json::to_string(&body).map_err(|e| {
        JournalLoadError::InvalidRecord { line: line_number, message: e.to_string() }
    })?;
    if record.sha256_hex != compute_record_sha256(&body_json, &loaded.last_sha256_hex) {
        return Err(JournalLoadError::HashChainBroken { line: line_number });
    }

    if let Some(previous) = loaded.journal.inputs.last()
        && record.turn <= previous.turn
    {
        return Err(JournalLoadError::InvalidRecord {
            line: line_number,
            message: format!("turn {} does not follow turn {}", record.turn, previous.turn),
        });
    }

    Ok(record)
}
