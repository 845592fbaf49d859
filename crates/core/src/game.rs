//! The turn engine: one player command, then every live monster, then status
//! decay and the game-over check.
//!
//! `Game` owns the dungeon together with the random stream and id allocator
//! that produced it, so a game is fully described by its configuration, its
//! seed and the commands applied to it.

use crate::config::GameConfiguration;
use crate::context::SimContext;
use crate::dungeon::Dungeon;
use crate::state::{Creature, PlayerState};
use crate::types::*;

mod autopilot;
mod bootstrap;
mod engine;
mod flee;
mod hash;
mod monsters;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

/// Turns a rage potion lasts, counting the turn it was drunk.
pub const RAGE_DURATION: u64 = 5;

#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfiguration,
    seed: u64,
    context: SimContext,
    dungeon: Dungeon,
    player: CreatureKey,
    turn: u64,
    heal_used_turn: Option<u64>,
    rage_used_turn: Option<u64>,
    phase: GamePhase,
    log: Vec<LogEvent>,
    // Turn-zero state restored by `reset`.
    initial_context: SimContext,
    initial_dungeon: Dungeon,
}

impl Game {
    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty_mode
    }

    /// Number of completed turns.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            GamePhase::Active => None,
            GamePhase::GameOver(outcome) => Some(outcome),
        }
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn player_key(&self) -> CreatureKey {
        self.player
    }

    pub fn player(&self) -> &Creature {
        &self.dungeon.creatures[self.player]
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        self.dungeon.player_state(self.player)
    }

    pub fn player_room(&self) -> RoomKey {
        self.player().room
    }

    pub fn live_monsters(&self) -> Vec<CreatureKey> {
        self.dungeon.live_monsters().collect()
    }

    /// Monsters sharing the player's room.
    pub fn is_in_combat(&self) -> bool {
        !self.dungeon.monsters_in(self.player_room()).is_empty()
    }

    pub fn heal_used_turn(&self) -> Option<u64> {
        self.heal_used_turn
    }

    pub fn rage_used_turn(&self) -> Option<u64> {
        self.rage_used_turn
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        self.dungeon.creatures[self.player].player_state_mut()
    }
}
