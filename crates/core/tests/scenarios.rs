use rogue_core::context::SimContext;
use rogue_core::mapgen::{self, PopulationRequest};
use rogue_core::{
    Command, CreatureKey, Difficulty, Dungeon, DungeonShape, Game, GameConfiguration, GameError,
    ItemKind, ItemUse, LogEvent, RoomKey, RoomRole,
};

fn lowest_exit_neighbor_capacity(dungeon: &Dungeon) -> usize {
    dungeon
        .exit_neighbors()
        .into_iter()
        .filter_map(|key| dungeon.room(key).map(|room| room.capacity))
        .min()
        .expect("exit has an ordinary neighbor")
}

#[test]
fn linear_five_rooms_seeded_with_three_monsters() {
    let mut successes = 0;
    for seed in 0..40_u64 {
        let mut context = SimContext::new(seed);
        let mut dungeon =
            mapgen::generate(DungeonShape::Linear, 5, 5, &mut context).expect("linear dungeon");
        // A capacity-1 exit guard caps every other ordinary room at zero.
        let roomy = lowest_exit_neighbor_capacity(&dungeon) >= 2;

        let seeded = mapgen::seed(&mut dungeon, &mut context, &PopulationRequest::new(3, 1, 1));
        assert_eq!(seeded, roomy, "seed {seed}");
        if !seeded {
            assert_eq!(dungeon.live_monster_count(), 0, "failed seeding placed monsters");
            continue;
        }
        successes += 1;

        for room in dungeon.exit_neighbors() {
            assert!(dungeon.room(room).expect("room").monster_count() >= 1, "seed {seed}");
        }
        let empty_rooms = dungeon
            .rooms()
            .filter(|room| room.role == RoomRole::Ordinary && room.item_count() == 0)
            .count();
        assert!(empty_rooms >= 2, "seed {seed}: only {empty_rooms} rooms without items");
        dungeon.validate().expect("seeded dungeon stays valid");
    }
    assert!(successes > 0, "no seed produced a seedable dungeon");
}

#[test]
fn two_room_linear_dungeon_is_invalid() {
    let mut context = SimContext::new(1);
    assert!(matches!(
        mapgen::generate(DungeonShape::Linear, 2, 1, &mut context),
        Err(GameError::InvalidConfiguration(_))
    ));

    let config = GameConfiguration { number_of_rooms: 2, ..Default::default() };
    assert!(matches!(Game::new(&config, 1), Err(GameError::InvalidConfiguration(_))));
}

/// start - hall - exit with a player and one monster in the hall.
fn duel(monster_stats: (i32, i32)) -> (Dungeon, RoomKey, CreatureKey, CreatureKey) {
    let mut dungeon = Dungeon::new();
    let start = dungeon.add_room("start".into(), RoomRole::Start, 0).expect("start");
    let hall = dungeon.add_room("hall".into(), RoomRole::Ordinary, 2).expect("hall");
    let exit = dungeon.add_room("exit".into(), RoomRole::Exit, 0).expect("exit");
    dungeon.connect(start, hall).expect("connect");
    dungeon.connect(hall, exit).expect("connect");

    let monster =
        dungeon.spawn_monster("m".into(), "goblin", monster_stats, hall).expect("monster");
    let player = dungeon.spawn_player("p".into(), "hero", (10, 1), hall).expect("player");
    (dungeon, hall, player, monster)
}

#[test]
fn killing_blow_removes_the_monster_and_scores() {
    let (mut dungeon, hall, player, monster) = duel((1, 1));

    let strike = dungeon.attack(player, monster).expect("attack");
    assert!(strike.killed);

    let dead = dungeon.creature(monster).expect("monster");
    assert_eq!(dead.hp, 0);
    assert!(!dead.alive);
    assert_eq!(dungeon.live_monsters().count(), 0);
    assert_eq!(dungeon.room(hall).expect("hall").monster_count(), 0);
    let state = dungeon.creature(player).and_then(|p| p.player_state()).expect("player state");
    assert_eq!(state.kill_points, 1);
}

#[test]
fn healing_at_full_hp_is_a_no_op() {
    let (mut dungeon, hall, player, _) = duel((3, 1));
    dungeon.spawn_item("potion".into(), ItemKind::HealingPotion { heal: 5 }, hall).expect("item");
    let picked = dungeon.pickup(player).expect("pickup");
    assert_eq!(picked.len(), 1);

    let effect = dungeon.use_item(player, picked[0], Difficulty::Normal).expect("use");
    assert_eq!(effect, ItemUse::NoEffect);
    let hero = dungeon.creature(player).expect("player");
    assert_eq!(hero.hp, hero.hp_max);
    assert_eq!(hero.player_state().expect("player state").inventory, picked);
}

#[test]
fn flee_fails_the_turn_after_healing() {
    // start - a - b - c - exit, every ordinary room holding one stuck monster.
    let mut dungeon = Dungeon::new();
    let start = dungeon.add_room("s".into(), RoomRole::Start, 0).expect("start");
    let rooms: Vec<RoomKey> = ["a", "b", "c"]
        .into_iter()
        .map(|id| dungeon.add_room(id.into(), RoomRole::Ordinary, 1).expect("room"))
        .collect();
    let exit = dungeon.add_room("e".into(), RoomRole::Exit, 0).expect("exit");
    let chain = [start, rooms[0], rooms[1], rooms[2], exit];
    for pair in chain.windows(2) {
        dungeon.connect(pair[0], pair[1]).expect("connect");
    }
    for (index, room) in rooms.iter().enumerate() {
        dungeon.spawn_monster(format!("m{index}"), "ogre", (1000, 1), *room).expect("monster");
    }
    dungeon.spawn_item("potion".into(), ItemKind::HealingPotion { heal: 5 }, start).expect("item");

    let mut game =
        Game::with_dungeon(&GameConfiguration::default(), 17, dungeon).expect("game should build");
    game.update(&Command::Pickup).expect("pickup");
    game.update(&Command::Move { room: "a".into() }).expect("move to a");
    game.update(&Command::Move { room: "b".into() }).expect("move to b");

    for _ in 0..200 {
        if game.player().hp < game.player().hp_max {
            break;
        }
        game.update(&Command::DoNothing).expect("wait");
    }
    assert!(game.player().hp < game.player().hp_max, "the ogre never hit");

    game.update(&Command::Use { item: "potion".into() }).expect("heal");
    assert_eq!(game.heal_used_turn(), Some(game.turn() - 1));
    assert!(game.player_flee_blocked());

    let before = game.player_room();
    game.update(&Command::Flee).expect("flee turn still resolves");
    assert_eq!(game.player_room(), before);
    let player = game.player_key();
    assert!(game.log().contains(&LogEvent::FleeBlocked { creature: player }));
}
