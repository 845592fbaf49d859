//! Flee eligibility and target selection for both the player and monsters.
//! This module exists to keep the difficulty-dependent flee rules in one place.
//! It does not own ordinary movement or combat resolution.

use super::*;

impl Game {
    /// Try to flee `creature` to a random eligible neighbor. Returns whether
    /// it moved. A player not sharing a room with a monster gets
    /// `NotInCombat`; a monster away from the player just stays put.
    pub fn flee(&mut self, creature: CreatureKey) -> Result<bool, GameError> {
        let Some(fleeing) = self.dungeon.creature(creature) else {
            return Err(GameError::IllegalAction("unknown creature".to_string()));
        };
        if !fleeing.alive {
            return Err(GameError::IllegalAction(format!("{} is dead", fleeing.id)));
        }

        let candidates = if fleeing.is_player() {
            if !self.is_in_combat() {
                return Err(GameError::NotInCombat);
            }
            self.player_flee_candidates()
        } else {
            if fleeing.room != self.player_room() {
                return Ok(false);
            }
            self.open_neighbors(fleeing.room)
        };

        let Some(&target) = self.context.rng.choose(&candidates) else {
            return Ok(false);
        };
        self.dungeon.move_creature(creature, target)?;
        Ok(true)
    }

    /// Whether the player's flee is currently restricted to the start room.
    pub fn player_flee_blocked(&self) -> bool {
        let Some(state) = self.player_state() else {
            return false;
        };
        let healed_last_turn =
            self.turn.checked_sub(1).is_some_and(|last| self.heal_used_turn == Some(last));
        let enraged_blocks = state.enraged && self.difficulty() != Difficulty::Newbie;
        let elite_blocks = self.difficulty() == Difficulty::Elite && !state.elite_flee;
        enraged_blocks || elite_blocks || healed_last_turn
    }

    fn player_flee_candidates(&self) -> Vec<RoomKey> {
        let Some(room) = self.dungeon.room(self.player_room()) else {
            return Vec::new();
        };
        let exit = self.dungeon.exit();
        let start = self.dungeon.start();
        let candidates: Vec<RoomKey> = room.neighbors().filter(|key| *key != exit).collect();
        if !self.player_flee_blocked() {
            return candidates;
        }
        if candidates.contains(&start) { vec![start] } else { Vec::new() }
    }

    /// Neighbors a monster could step into right now.
    pub(super) fn open_neighbors(&self, room: RoomKey) -> Vec<RoomKey> {
        let Some(room) = self.dungeon.room(room) else {
            return Vec::new();
        };
        room.neighbors()
            .filter(|key| self.dungeon.room(*key).is_some_and(|next| next.has_spare_capacity()))
            .collect()
    }
}
