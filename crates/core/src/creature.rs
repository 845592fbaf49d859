//! Movement and melee primitives on the dungeon.
//! This module exists to keep room bookkeeping for moving or dying creatures in one place.
//! It does not own turn ordering, flee eligibility, or any random decision.

use crate::dungeon::Dungeon;
use crate::types::*;

/// Result of one resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub damage: i32,
    pub killed: bool,
}

impl Dungeon {
    /// Move a living creature to an adjacent room. Monsters need spare
    /// capacity at the destination; the player never counts toward it.
    pub fn move_creature(
        &mut self,
        key: CreatureKey,
        destination: RoomKey,
    ) -> Result<(), GameError> {
        let Some(creature) = self.creatures.get(key) else {
            return Err(GameError::IllegalMove("unknown creature".to_string()));
        };
        if !creature.alive {
            return Err(GameError::IllegalMove(format!("{} is dead", creature.id)));
        }
        let from = creature.room;
        let Some(target) = self.rooms.get(destination) else {
            return Err(GameError::IllegalMove("unknown destination room".to_string()));
        };
        if !target.is_neighbor(from) {
            return Err(GameError::IllegalMove(format!(
                "{} is not adjacent to {}'s room",
                target.id, creature.id
            )));
        }
        let is_player = creature.is_player();
        if !is_player && !target.has_spare_capacity() {
            return Err(GameError::IllegalMove(format!("room {} is full", target.id)));
        }

        if !is_player {
            self.rooms[from].monsters.remove(&key);
            self.rooms[destination].monsters.insert(key);
        }
        self.creatures[key].room = destination;
        Ok(())
    }

    /// Resolve a single blow. A killed monster leaves its room and the live
    /// set; a killing player earns one kill point.
    pub fn attack(
        &mut self,
        attacker: CreatureKey,
        defender: CreatureKey,
    ) -> Result<Strike, GameError> {
        if attacker == defender {
            return Err(GameError::IllegalAction("a creature cannot attack itself".to_string()));
        }
        let (Some(striker), Some(target)) =
            (self.creatures.get(attacker), self.creatures.get(defender))
        else {
            return Err(GameError::IllegalAction("unknown combatant".to_string()));
        };
        if !striker.alive || !target.alive {
            return Err(GameError::IllegalAction(format!(
                "{} and {} must both be alive",
                striker.id, target.id
            )));
        }
        if striker.room != target.room {
            return Err(GameError::IllegalAction(format!(
                "{} is not in the same room as {}",
                target.id, striker.id
            )));
        }

        let damage = striker.attack;
        let target = &mut self.creatures[defender];
        target.hp = (target.hp - damage).max(0);
        let killed = target.hp == 0;
        if killed {
            target.alive = false;
            let room = target.room;
            if !target.is_player() {
                self.rooms[room].monsters.remove(&defender);
                self.live_monsters.remove(&defender);
            }
            if let Some(state) = self.creatures[attacker].player_state_mut() {
                state.kill_points += 1;
            }
        }
        Ok(Strike { damage, killed })
    }

    /// Living monsters sharing `room`, in key order.
    pub fn monsters_in(&self, room: RoomKey) -> Vec<CreatureKey> {
        self.rooms.get(room).map(|room| room.monsters().collect()).unwrap_or_default()
    }
}
