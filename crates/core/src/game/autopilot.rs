//! A simple greedy policy that picks the player's next command.
//! This module exists so tools and tests can drive whole games without input.
//! It does not own command validation; every suggestion goes through `update`.

use super::*;
use crate::state::ItemKind;

impl Game {
    /// Fight whatever shares the room, drinking a healing potion first when
    /// the next round of blows could be fatal; otherwise pick up loot and
    /// walk the shortest path to the exit.
    pub fn autopilot_command(&self) -> Command {
        if self.is_over() {
            return Command::DoNothing;
        }
        let player = self.player();
        let foes = self.dungeon.monsters_in(player.room);

        if let Some(&foe) = foes.first() {
            let incoming: i32 = foes
                .iter()
                .filter_map(|key| self.dungeon.creature(*key))
                .map(|monster| monster.attack)
                .sum();
            if player.hp <= incoming
                && let Some(potion) = self.first_potion(|kind| {
                    matches!(kind, ItemKind::HealingPotion { .. })
                })
            {
                return Command::Use { item: potion };
            }
            if let Some(target) = self.dungeon.creature(foe) {
                return Command::Attack { target: target.id.clone() };
            }
        }

        if self.dungeon.room(player.room).is_some_and(|room| room.item_count() > 0) {
            return Command::Pickup;
        }
        match self
            .dungeon
            .next_step_towards(player.room, self.dungeon.exit())
            .and_then(|next| self.dungeon.room(next))
        {
            Some(next) => Command::Move { room: next.id.clone() },
            None => Command::DoNothing,
        }
    }

    fn first_potion(&self, wanted: impl Fn(ItemKind) -> bool) -> Option<String> {
        self.player_state()?
            .inventory
            .iter()
            .filter_map(|key| self.dungeon.item(*key))
            .find(|item| wanted(item.kind))
            .map(|item| item.id.clone())
    }
}
