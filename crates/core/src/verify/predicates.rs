//! State and transition predicates for the game's standing laws, ready to be
//! wrapped in `TemporalSpec::always` or `TemporalSpec::always_change`.

use crate::game::Game;
use crate::state::CreatureRole;
use crate::types::CommandKind;

/// No room holds more monsters than its capacity.
pub fn rooms_within_capacity(game: &Game) -> bool {
    game.dungeon().rooms().all(|room| room.monster_count() <= room.capacity)
}

/// Living creatures have `0 < hp <= hp_max`; dead ones have none left.
pub fn hp_within_bounds(game: &Game) -> bool {
    game.dungeon().creatures().all(|creature| {
        if creature.alive {
            creature.hp > 0 && creature.hp <= creature.hp_max
        } else {
            creature.hp == 0
        }
    })
}

/// Every live monster is alive and listed in its room; dead monsters are in
/// no room.
pub fn dead_monsters_not_live(game: &Game) -> bool {
    let dungeon = game.dungeon();
    let live_ok = dungeon.live_monsters().all(|key| {
        dungeon.creature(key).is_some_and(|monster| {
            monster.alive
                && dungeon.room(monster.room).is_some_and(|room| room.monsters().any(|k| k == key))
        })
    });
    let dead_ok = dungeon
        .creatures()
        .filter(|creature| creature.role == CreatureRole::Monster && !creature.alive)
        .all(|monster| dungeon.rooms().all(|room| room.monsters().all(|k| k != monster.key)));
    live_ok && dead_ok
}

/// The player's kill points grow by exactly the number of monsters that died.
pub fn kill_points_match_deaths(previous: &Game, next: &Game) -> bool {
    let killed = previous
        .dungeon()
        .live_monster_count()
        .checked_sub(next.dungeon().live_monster_count());
    let (Some(before), Some(after)) = (previous.player_state(), next.player_state()) else {
        return false;
    };
    let earned = after.kill_points.checked_sub(before.kill_points);
    match (killed, earned) {
        (Some(killed), Some(earned)) => killed == earned as usize,
        _ => false,
    }
}

/// Nothing is created after construction: neither items nor monsters.
pub fn nothing_spawns(previous: &Game, next: &Game) -> bool {
    next.dungeon().item_count() <= previous.dungeon().item_count()
        && next.dungeon().creatures().count() <= previous.dungeon().creatures().count()
        && next.dungeon().live_monster_count() <= previous.dungeon().live_monster_count()
}

/// A flee on the turn right after healing can only reach the start room.
pub fn flee_blocked_after_heal(previous: &Game, next: &Game) -> bool {
    let healed_last_turn = previous
        .turn()
        .checked_sub(1)
        .is_some_and(|last| previous.heal_used_turn() == Some(last));
    if !healed_last_turn || next.player().last_action != Some(CommandKind::Flee) {
        return true;
    }
    let room = next.player_room();
    room == previous.player_room() || room == next.dungeon().start()
}
