//! Turn resolution: the player's command, monster turns, rage decay and the
//! game-over check, in that order.

use super::*;
use crate::creature::Strike;
use crate::state::ItemLocation;

impl Game {
    /// Resolve one full turn. A rejected player command leaves the game
    /// exactly as it was: no monster acts and the turn does not advance.
    pub fn update(&mut self, command: &Command) -> Result<(), GameError> {
        if let GamePhase::GameOver(outcome) = self.phase {
            return Err(GameError::IllegalAction(format!("game is already over ({outcome:?})")));
        }

        self.apply_player_command(command)?;
        self.dungeon.creatures[self.player].last_action = Some(command.kind());
        log::debug!("turn {}: player {:?}", self.turn, command);

        self.run_monster_turns();
        self.decay_rage();
        self.turn += 1;
        self.check_game_over();
        Ok(())
    }

    fn apply_player_command(&mut self, command: &Command) -> Result<(), GameError> {
        let player = self.player;
        match command {
            Command::Move { room } => {
                let Some(destination) = self.dungeon.room_by_id(room) else {
                    return Err(GameError::IllegalMove(format!("no room with id {room}")));
                };
                let from = self.player_room();
                self.dungeon.move_creature(player, destination)?;
                self.refresh_elite_flee(destination);
                self.log.push(LogEvent::Moved { creature: player, from, to: destination });
            }
            Command::Attack { target } => {
                let Some(defender) = self.dungeon.creature_by_id(target) else {
                    return Err(GameError::IllegalAction(format!("no creature with id {target}")));
                };
                let strike = self.dungeon.attack(player, defender)?;
                self.record_strike(player, defender, strike);
            }
            Command::Use { item } => {
                let key = self
                    .dungeon
                    .item_by_id(item)
                    .filter(|key| {
                        self.dungeon
                            .item(*key)
                            .is_some_and(|item| item.location == ItemLocation::Inventory)
                    })
                    .ok_or_else(|| GameError::ItemNotOwned(item.clone()))?;
                let difficulty = self.difficulty();
                let effect = self.dungeon.use_item(player, key, difficulty)?;
                match effect {
                    ItemUse::Healed { .. } => self.heal_used_turn = Some(self.turn),
                    ItemUse::Enraged => self.rage_used_turn = Some(self.turn),
                    ItemUse::NoEffect => {}
                }
                self.log.push(LogEvent::ItemUsed { item: key, effect });
            }
            Command::Pickup => {
                let items = self.dungeon.pickup(player)?;
                self.log.push(LogEvent::PickedUp { items });
            }
            Command::Flee => {
                let from = self.player_room();
                if self.flee(player)? {
                    let to = self.player_room();
                    log::debug!("player fled from {from:?} to {to:?}");
                    self.log.push(LogEvent::Fled { creature: player, to });
                } else {
                    self.log.push(LogEvent::FleeBlocked { creature: player });
                }
            }
            Command::DoNothing => self.log.push(LogEvent::Idle { creature: player }),
        }
        Ok(())
    }

    /// A regular move next to the start restores the Elite flee right; an
    /// enraged Elite player stepping next to the exit loses it.
    fn refresh_elite_flee(&mut self, destination: RoomKey) {
        let near_start = self.dungeon.is_start_adjacent(destination);
        let near_exit = self.dungeon.is_exit_adjacent(destination);
        let elite = self.difficulty() == Difficulty::Elite;
        if let Some(state) = self.player_state_mut() {
            if near_start {
                state.elite_flee = true;
            }
            if elite && state.enraged && near_exit {
                state.elite_flee = false;
            }
        }
    }

    pub(super) fn record_strike(
        &mut self,
        attacker: CreatureKey,
        defender: CreatureKey,
        strike: Strike,
    ) {
        self.log.push(LogEvent::Attacked { attacker, defender, damage: strike.damage });
        if strike.killed {
            self.log.push(LogEvent::Died { creature: defender });
        }
    }

    fn decay_rage(&mut self) {
        let Some(used) = self.rage_used_turn else {
            return;
        };
        if self.turn + 1 < used + RAGE_DURATION {
            return;
        }
        self.rage_used_turn = None;
        if let Some(state) = self.player_state_mut()
            && state.enraged
        {
            state.enraged = false;
            self.log.push(LogEvent::RageExpired);
        }
    }

    fn check_game_over(&mut self) {
        let outcome = if !self.player().alive {
            RunOutcome::Defeat
        } else if self.player_room() == self.dungeon.exit() {
            RunOutcome::Victory
        } else {
            return;
        };
        self.phase = GamePhase::GameOver(outcome);
        self.log.push(LogEvent::GameOver(outcome));
        log::info!(
            "game over after {} turns: {outcome:?}, {} kill points",
            self.turn,
            self.player_state().map_or(0, |state| state.kill_points)
        );
    }
}
