//! Re-simulation of recorded games.
//!
//! A `Replay` rebuilds the game a journal was recorded from and steps through
//! the recorded turns one at a time, so callers can inspect the state between
//! turns. `replay_to_end` is the batch form used for determinism checks.

use crate::game::Game;
use crate::journal::InputJournal;
use crate::types::{GameError, RunOutcome};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("recorded game cannot be rebuilt: {0}")]
    Construction(GameError),
    #[error("recorded input {index} was rejected: {source}")]
    Rejected { index: usize, source: GameError },
    #[error("no recorded input left to replay")]
    Exhausted,
    #[error("game ended with {remaining} recorded inputs still unplayed")]
    TrailingInputs { remaining: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_turn: u64,
    pub final_outcome: Option<RunOutcome>,
    pub final_snapshot_hash: u64,
}

#[derive(Debug, Clone)]
pub struct Replay {
    journal: InputJournal,
    game: Game,
    cursor: usize,
}

impl Replay {
    pub fn new(journal: InputJournal) -> Result<Self, ReplayError> {
        let game = Game::new(&journal.config, journal.seed).map_err(ReplayError::Construction)?;
        Ok(Self { journal, game, cursor: 0 })
    }

    /// Back to the state before the first recorded turn.
    pub fn reset(&mut self) {
        self.game.reset();
        self.cursor = 0;
    }

    /// Index of the next recorded input to replay.
    pub fn turn(&self) -> usize {
        self.cursor
    }

    /// Number of recorded inputs.
    pub fn len(&self) -> usize {
        self.journal.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.inputs.is_empty()
    }

    /// True once every recorded input has been replayed or the game is over.
    pub fn at_the_end(&self) -> bool {
        self.cursor >= self.len() || self.game.is_over()
    }

    pub fn state(&self) -> &Game {
        &self.game
    }

    pub fn journal(&self) -> &InputJournal {
        &self.journal
    }

    pub fn replay_current_turn(&mut self) -> Result<(), ReplayError> {
        let Some(record) = self.journal.inputs.get(self.cursor) else {
            return Err(ReplayError::Exhausted);
        };
        self.game
            .replay_turn(record)
            .map_err(|source| ReplayError::Rejected { index: self.cursor, source })?;
        self.cursor += 1;
        Ok(())
    }
}

pub fn replay_to_end(journal: &InputJournal) -> Result<ReplayResult, ReplayError> {
    let mut replay = Replay::new(journal.clone())?;
    while !replay.at_the_end() {
        replay.replay_current_turn()?;
    }
    let remaining = replay.len() - replay.turn();
    if remaining > 0 {
        return Err(ReplayError::TrailingInputs { remaining });
    }

    let game = replay.state();
    Ok(ReplayResult {
        final_turn: game.turn(),
        final_outcome: game.outcome(),
        final_snapshot_hash: game.snapshot_hash(),
    })
}

/// Rebuild the game a possibly unfinished journal describes, e.g. after a
/// crash mid-session. Unlike `replay_to_end`, the game need not be over.
pub fn replay_journal_inputs(journal: &InputJournal) -> Result<Game, ReplayError> {
    let mut replay = Replay::new(journal.clone())?;
    while replay.turn() < replay.len() {
        replay.replay_current_turn()?;
    }
    Ok(replay.game)
}
