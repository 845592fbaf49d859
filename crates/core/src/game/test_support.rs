//! Shared test fixtures for the `game` test suite.
//! This module exists to avoid repeating dungeon and creature setup across tests.
//! It does not own production gameplay logic.

use super::*;
use crate::ids::IdCategory;
use crate::state::{ItemKind, ItemLocation};

/// `r0` (start) - `r1` - `r2` - `r3` - `r4` (exit), ordinary rooms holding
/// two monsters each, no monsters or items yet.
pub(super) fn corridor_game(difficulty: Difficulty) -> (Game, [RoomKey; 5]) {
    let mut dungeon = Dungeon::new();
    let rooms = [
        dungeon.add_room("r0".into(), RoomRole::Start, 0).expect("start"),
        dungeon.add_room("r1".into(), RoomRole::Ordinary, 2).expect("r1"),
        dungeon.add_room("r2".into(), RoomRole::Ordinary, 2).expect("r2"),
        dungeon.add_room("r3".into(), RoomRole::Ordinary, 2).expect("r3"),
        dungeon.add_room("r4".into(), RoomRole::Exit, 0).expect("exit"),
    ];
    for pair in rooms.windows(2) {
        dungeon.connect(pair[0], pair[1]).expect("connect");
    }
    let config = GameConfiguration { difficulty_mode: difficulty, ..GameConfiguration::default() };
    let game = Game::with_dungeon(&config, 7, dungeon).expect("corridor game");
    (game, rooms)
}

pub(super) fn add_goblin(game: &mut Game, room: RoomKey) -> CreatureKey {
    let id = game.context.ids.next(IdCategory::Creature);
    game.dungeon.spawn_monster(id, "goblin", (3, 1), room).expect("goblin fits")
}

pub(super) fn place_player(game: &mut Game, room: RoomKey) {
    game.dungeon.creatures[game.player].room = room;
}

/// Put a fresh item straight into the player's inventory; returns its id.
pub(super) fn give_item(game: &mut Game, kind: ItemKind) -> String {
    let id = game.context.ids.next(IdCategory::Item);
    let room = game.player_room();
    let key = game.dungeon.spawn_item(id.clone(), kind, room).expect("item");
    game.dungeon.rooms[room].items.remove(&key);
    game.dungeon.items[key].location = ItemLocation::Inventory;
    game.player_state_mut().expect("player").inventory.push(key);
    id
}

pub(super) fn room_id(game: &Game, room: RoomKey) -> String {
    game.dungeon.room(room).expect("room").id.clone()
}

pub(super) fn move_to(game: &Game, room: RoomKey) -> Command {
    Command::Move { room: room_id(game, room) }
}
