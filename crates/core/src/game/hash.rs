//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from turn resolution.
//! It does not own replay execution or journal persistence.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;
use crate::state::{CreatureRole, ItemKind, ItemLocation};

impl Game {
    /// Hash of everything a later turn can observe. Two games with the same
    /// seed, configuration and commands always agree on it.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.turn);
        hasher.write_u64(self.context.rng.draws());
        hasher.write_u8(match self.phase {
            GamePhase::Active => 0,
            GamePhase::GameOver(RunOutcome::Victory) => 1,
            GamePhase::GameOver(RunOutcome::Defeat) => 2,
        });
        write_turn(&mut hasher, self.heal_used_turn);
        write_turn(&mut hasher, self.rage_used_turn);

        for room in self.dungeon.rooms() {
            hasher.write(room.id.as_bytes());
            hasher.write_usize(room.capacity);
            hasher.write_usize(room.monster_count());
            hasher.write_usize(room.item_count());
        }
        for creature in self.dungeon.creatures() {
            hasher.write(creature.id.as_bytes());
            hasher.write_i32(creature.hp);
            hasher.write_u8(u8::from(creature.alive));
            if let Some(room) = self.dungeon.room(creature.room) {
                hasher.write(room.id.as_bytes());
            }
            if let CreatureRole::Player(state) = &creature.role {
                hasher.write_u32(state.kill_points);
                hasher.write_u8(u8::from(state.enraged));
                hasher.write_u8(u8::from(state.elite_flee));
                for item in &state.inventory {
                    if let Some(item) = self.dungeon.item(*item) {
                        hasher.write(item.id.as_bytes());
                    }
                }
            }
        }
        for item in self.dungeon.items() {
            hasher.write(item.id.as_bytes());
            hasher.write_i32(match item.kind {
                ItemKind::HealingPotion { heal } => heal,
                ItemKind::RagePotion => -1,
            });
            hasher.write_u8(u8::from(item.location == ItemLocation::Inventory));
        }
        hasher.finish()
    }
}

fn write_turn(hasher: &mut Xxh3, turn: Option<u64>) {
    match turn {
        Some(turn) => {
            hasher.write_u8(1);
            hasher.write_u64(turn);
        }
        None => hasher.write_u8(0),
    }
}
