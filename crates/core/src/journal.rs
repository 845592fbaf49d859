//! In-memory record of a played game: what it was built from and every
//! accepted command, in turn order.

use serde::{Deserialize, Serialize};

use crate::config::GameConfiguration;
use crate::types::Command;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub seed: u64,
    pub config: GameConfiguration,
    pub inputs: Vec<InputRecord>,
}

/// One accepted command and the turn it was applied on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub turn: u64,
    pub command: Command,
}

impl InputJournal {
    pub fn new(config: GameConfiguration, seed: u64) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: "dev".to_string(),
            seed,
            config,
            inputs: Vec::new(),
        }
    }

    pub fn append(&mut self, turn: u64, command: Command) {
        self.inputs.push(InputRecord { turn, command });
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
