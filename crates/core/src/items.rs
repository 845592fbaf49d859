//! Potion use and pickup on behalf of the player.

use std::mem;

use crate::dungeon::Dungeon;
use crate::state::{ItemKind, ItemLocation};
use crate::types::*;

impl Dungeon {
    /// Drink `item` from the player's inventory. A healing potion at full HP
    /// has no effect and stays in the inventory; any other use consumes it.
    pub fn use_item(
        &mut self,
        player: CreatureKey,
        item: ItemKey,
        difficulty: Difficulty,
    ) -> Result<ItemUse, GameError> {
        let Some(user) = self.creatures.get(player) else {
            return Err(GameError::IllegalAction("unknown player".to_string()));
        };
        let owned = user.player_state().is_some_and(|state| state.inventory.contains(&item));
        let Some(potion) = self.items.get(item).filter(|_| owned) else {
            let id = self.items.get(item).map_or("unknown item", |potion| potion.id.as_str());
            return Err(GameError::ItemNotOwned(id.to_string()));
        };
        if !user.alive {
            return Err(GameError::IllegalAction(format!("{} is dead", user.id)));
        }

        let exit_adjacent = self.is_exit_adjacent(user.room);
        let effect = match potion.kind {
            ItemKind::HealingPotion { .. } if user.hp >= user.hp_max => {
                return Ok(ItemUse::NoEffect);
            }
            ItemKind::HealingPotion { heal } => {
                let amount = heal.min(user.hp_max - user.hp);
                self.creatures[player].hp += amount;
                ItemUse::Healed { amount }
            }
            ItemKind::RagePotion => {
                if let Some(state) = self.creatures[player].player_state_mut() {
                    state.enraged = true;
                    if difficulty == Difficulty::Elite && exit_adjacent {
                        state.elite_flee = false;
                    }
                }
                ItemUse::Enraged
            }
        };

        if let Some(state) = self.creatures[player].player_state_mut() {
            state.inventory.retain(|owned| *owned != item);
        }
        self.items.remove(item);
        Ok(effect)
    }

    /// Move every item in the player's room to the end of the inventory, in
    /// key order. Returns the items taken.
    pub fn pickup(&mut self, player: CreatureKey) -> Result<Vec<ItemKey>, GameError> {
        let Some(room) = self
            .creatures
            .get(player)
            .filter(|creature| creature.is_player() && creature.alive)
            .map(|creature| creature.room)
        else {
            return Err(GameError::IllegalAction("only a living player can pick up".into()));
        };

        let taken: Vec<ItemKey> = mem::take(&mut self.rooms[room].items).into_iter().collect();
        for key in &taken {
            if let Some(item) = self.items.get_mut(*key) {
                item.location = ItemLocation::Inventory;
            }
        }
        if let Some(state) = self.creatures[player].player_state_mut() {
            state.inventory.extend(taken.iter().copied());
        }
        Ok(taken)
    }
}
