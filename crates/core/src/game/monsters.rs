//! Monster behaviour for one turn.
//! Each live monster picks an action uniformly from what its situation allows,
//! then a uniformly random target room when the action needs one.

use super::*;

const COMBAT_ACTIONS: [CommandKind; 3] =
    [CommandKind::Attack, CommandKind::DoNothing, CommandKind::Flee];
const ROAMING_ACTIONS: [CommandKind; 2] = [CommandKind::Move, CommandKind::DoNothing];

impl Game {
    /// Let every monster alive at the start of the phase act once, in key
    /// order. Once the player is dead the remaining monsters stand still.
    pub(super) fn run_monster_turns(&mut self) {
        for monster in self.live_monsters() {
            if !self.player().alive {
                break;
            }
            if self.dungeon.creature(monster).is_some_and(|creature| creature.alive) {
                self.monster_turn(monster);
            }
        }
    }

    fn monster_turn(&mut self, monster: CreatureKey) {
        let room = self.dungeon.creatures[monster].room;
        let actions: &[CommandKind] =
            if room == self.player_room() { &COMBAT_ACTIONS } else { &ROAMING_ACTIONS };
        let choice = self.context.rng.choose(actions).copied().unwrap_or(CommandKind::DoNothing);

        let performed = match choice {
            CommandKind::Attack => match self.dungeon.attack(monster, self.player) {
                Ok(strike) => {
                    self.record_strike(monster, self.player, strike);
                    CommandKind::Attack
                }
                Err(error) => {
                    log::debug!("monster attack skipped: {error}");
                    CommandKind::DoNothing
                }
            },
            CommandKind::Flee => match self.flee(monster) {
                Ok(true) => {
                    let to = self.dungeon.creatures[monster].room;
                    self.log.push(LogEvent::Fled { creature: monster, to });
                    CommandKind::Flee
                }
                _ => CommandKind::DoNothing,
            },
            CommandKind::Move => {
                let candidates = self.open_neighbors(room);
                let Some(to) = self.context.rng.choose(&candidates).copied() else {
                    return self.idle_monster(monster);
                };
                match self.dungeon.move_creature(monster, to) {
                    Ok(()) => {
                        self.log.push(LogEvent::Moved { creature: monster, from: room, to });
                        CommandKind::Move
                    }
                    Err(_) => CommandKind::DoNothing,
                }
            }
            _ => CommandKind::DoNothing,
        };

        if performed == CommandKind::DoNothing {
            return self.idle_monster(monster);
        }
        self.dungeon.creatures[monster].last_action = Some(performed);
    }

    fn idle_monster(&mut self, monster: CreatureKey) {
        self.log.push(LogEvent::Idle { creature: monster });
        self.dungeon.creatures[monster].last_action = Some(CommandKind::DoNothing);
    }
}
