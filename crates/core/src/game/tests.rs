use super::test_support::*;
use super::*;
use crate::journal::InputRecord;
use crate::state::ItemKind;

const HEAL: ItemKind = ItemKind::HealingPotion { heal: 5 };

#[test]
fn new_game_starts_in_start_room_with_scaled_stats() {
    let config = GameConfiguration::default();
    let game = Game::new(&config, 1234).expect("default configuration is feasible");

    assert_eq!(game.turn(), 0);
    assert_eq!(game.phase(), GamePhase::Active);
    assert_eq!(game.player_room(), game.dungeon().start());
    assert_eq!(game.player().hp, 20);
    assert_eq!(game.player().attack, 2);
    assert!(game.player_state().expect("player").elite_flee);
    assert_eq!(game.live_monsters().len(), config.initial_number_of_monsters);
    assert_eq!(game.dungeon().item_count(), 3);
    assert_eq!(game.dungeon().room_count(), config.number_of_rooms);
    game.dungeon().validate().expect("valid dungeon");
}

#[test]
fn unbuildable_configurations_are_rejected() {
    let too_small = GameConfiguration { number_of_rooms: 2, ..GameConfiguration::default() };
    assert!(matches!(Game::new(&too_small, 1), Err(GameError::InvalidConfiguration(_))));

    let crowded = GameConfiguration {
        number_of_rooms: 5,
        max_room_capacity: 1,
        initial_number_of_monsters: 10,
        ..GameConfiguration::default()
    };
    let Err(GameError::InvalidConfiguration(reason)) = Game::new(&crowded, 1) else {
        panic!("ten monsters cannot fit in three single-capacity rooms");
    };
    assert!(reason.contains("10 monsters requested"), "{reason}");

    let no_rage =
        GameConfiguration { initial_number_of_rage_pots: 0, ..GameConfiguration::default() };
    assert!(matches!(Game::new(&no_rage, 1), Err(GameError::InvalidConfiguration(_))));
}

#[test]
fn rejected_commands_change_nothing() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    add_goblin(&mut game, rooms[2]);
    let before = game.snapshot_hash();
    let log_len = game.log().len();

    let far = move_to(&game, rooms[3]);
    assert!(matches!(game.update(&far), Err(GameError::IllegalMove(_))));
    let nowhere = Command::Move { room: "r99".into() };
    assert!(matches!(game.update(&nowhere), Err(GameError::IllegalMove(_))));
    let ghost = Command::Attack { target: "c42".into() };
    assert!(matches!(game.update(&ghost), Err(GameError::IllegalAction(_))));
    let distant = Command::Attack { target: "c1".into() };
    assert!(matches!(game.update(&distant), Err(GameError::IllegalAction(_))));
    let missing = Command::Use { item: "i7".into() };
    assert_eq!(game.update(&missing), Err(GameError::ItemNotOwned("i7".into())));
    assert_eq!(game.update(&Command::Flee), Err(GameError::NotInCombat));

    assert_eq!(game.snapshot_hash(), before);
    assert_eq!(game.turn(), 0);
    assert_eq!(game.log().len(), log_len);
}

#[test]
fn killing_blow_scores_and_empties_live_set() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    let goblin = add_goblin(&mut game, rooms[1]);
    game.dungeon.creatures[goblin].hp = 2;
    place_player(&mut game, rooms[1]);

    game.update(&Command::Attack { target: "c1".into() }).expect("attack");

    let dead = game.dungeon().creature(goblin).expect("goblin");
    assert!(!dead.alive);
    assert_eq!(dead.hp, 0);
    assert!(game.live_monsters().is_empty());
    assert_eq!(game.player_state().expect("player").kill_points, 1);
    assert_eq!(game.turn(), 1);
    assert!(game.log().contains(&LogEvent::Died { creature: goblin }));
    assert_eq!(game.player().last_action, Some(CommandKind::Attack));
}

#[test]
fn healing_at_full_hp_keeps_the_potion() {
    let (mut game, _) = corridor_game(Difficulty::Normal);
    let potion = give_item(&mut game, HEAL);

    game.update(&Command::Use { item: potion.clone() }).expect("use");

    assert_eq!(game.player_state().expect("player").inventory.len(), 1);
    assert_eq!(game.heal_used_turn(), None);
    assert_eq!(game.player().hp, game.player().hp_max);

    game.dungeon.creatures[game.player].hp = 12;
    game.update(&Command::Use { item: potion }).expect("use");
    assert_eq!(game.player().hp, 17);
    assert!(game.player_state().expect("player").inventory.is_empty());
    assert_eq!(game.heal_used_turn(), Some(1));
}

#[test]
fn flee_is_blocked_the_turn_after_healing() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    add_goblin(&mut game, rooms[2]);
    place_player(&mut game, rooms[2]);
    game.turn = 3;

    game.heal_used_turn = Some(2);
    assert!(game.player_flee_blocked());
    assert_eq!(game.flee(game.player), Ok(false));
    assert_eq!(game.player_room(), rooms[2]);

    game.heal_used_turn = Some(1);
    assert!(!game.player_flee_blocked());
    assert_eq!(game.flee(game.player), Ok(true));
    assert!([rooms[1], rooms[3]].contains(&game.player_room()));
}

#[test]
fn blocked_player_next_to_start_still_escapes_there() {
    let (mut game, rooms) = corridor_game(Difficulty::Elite);
    add_goblin(&mut game, rooms[1]);
    place_player(&mut game, rooms[1]);
    game.player_state_mut().expect("player").enraged = true;
    game.player_state_mut().expect("player").elite_flee = false;

    assert!(game.player_flee_blocked());
    assert_eq!(game.flee(game.player), Ok(true));
    assert_eq!(game.player_room(), rooms[0]);
}

#[test]
fn rage_blocks_flee_except_for_newbies() {
    for (difficulty, blocked) in
        [(Difficulty::Newbie, false), (Difficulty::Normal, true), (Difficulty::Elite, true)]
    {
        let (mut game, rooms) = corridor_game(difficulty);
        add_goblin(&mut game, rooms[2]);
        place_player(&mut game, rooms[2]);
        game.player_state_mut().expect("player").enraged = true;
        assert_eq!(game.player_flee_blocked(), blocked, "{difficulty:?}");
    }
}

#[test]
fn elite_flee_is_lost_near_exit_and_restored_near_start() {
    let (mut game, rooms) = corridor_game(Difficulty::Elite);
    place_player(&mut game, rooms[3]);
    let rage = give_item(&mut game, ItemKind::RagePotion);

    game.update(&Command::Use { item: rage }).expect("rage");
    assert!(game.player_state().expect("player").enraged);
    assert!(!game.player_state().expect("player").elite_flee);

    game.update(&move_to(&game, rooms[2])).expect("move");
    assert!(!game.player_state().expect("player").elite_flee);
    game.update(&move_to(&game, rooms[1])).expect("move");
    assert!(game.player_state().expect("player").elite_flee);

    game.update(&move_to(&game, rooms[2])).expect("move");
    game.update(&move_to(&game, rooms[3])).expect("move");
    assert!(!game.player_state().expect("player").elite_flee, "enraged elite player walked next to exit");
}

#[test]
fn rage_lasts_five_turns_including_the_first() {
    let (mut game, _) = corridor_game(Difficulty::Normal);
    let rage = give_item(&mut game, ItemKind::RagePotion);

    game.update(&Command::Use { item: rage }).expect("rage");
    assert_eq!(game.rage_used_turn(), Some(0));
    for _ in 0..3 {
        game.update(&Command::DoNothing).expect("wait");
        assert!(game.player_state().expect("player").enraged, "turn {}", game.turn());
    }
    game.update(&Command::DoNothing).expect("wait");
    assert!(!game.player_state().expect("player").enraged);
    assert_eq!(game.rage_used_turn(), None);
    assert_eq!(game.log().iter().filter(|event| **event == LogEvent::RageExpired).count(), 1);
}

#[test]
fn reaching_the_exit_wins_and_freezes_the_game() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    for room in &rooms[1..] {
        game.update(&move_to(&game, *room)).expect("walk");
    }
    assert_eq!(game.outcome(), Some(RunOutcome::Victory));
    assert_eq!(game.turn(), 4);
    assert_eq!(game.log().last(), Some(&LogEvent::GameOver(RunOutcome::Victory)));

    let frozen = game.snapshot_hash();
    assert!(matches!(game.update(&Command::DoNothing), Err(GameError::IllegalAction(_))));
    assert_eq!(game.snapshot_hash(), frozen);
}

#[test]
fn monsters_stop_once_the_player_dies() {
    let mut dungeon = Dungeon::new();
    let start = dungeon.add_room("r0".into(), RoomRole::Start, 0).expect("start");
    let lair = dungeon.add_room("r1".into(), RoomRole::Ordinary, 2).expect("lair");
    let exit = dungeon.add_room("r2".into(), RoomRole::Exit, 0).expect("exit");
    dungeon.connect(start, lair).expect("connect");
    dungeon.connect(lair, exit).expect("connect");
    let mut game =
        Game::with_dungeon(&GameConfiguration::default(), 99, dungeon).expect("game");
    add_goblin(&mut game, lair);
    add_goblin(&mut game, lair);
    place_player(&mut game, lair);
    game.dungeon.creatures[game.player].hp = 1;

    for _ in 0..100 {
        if game.is_over() {
            break;
        }
        game.update(&Command::DoNothing).expect("wait");
    }

    assert_eq!(game.outcome(), Some(RunOutcome::Defeat));
    assert!(!game.player().alive);
    assert_eq!(game.player().hp, 0);
    let player = game.player;
    let death = game
        .log()
        .iter()
        .position(|event| *event == LogEvent::Died { creature: player })
        .expect("player death is logged");
    assert_eq!(&game.log()[death + 1..], &[LogEvent::GameOver(RunOutcome::Defeat)]);
}

#[test]
fn reset_returns_to_turn_zero() {
    let mut game = Game::new(&GameConfiguration::default(), 5).expect("game");
    let fresh = game.snapshot_hash();
    let first_room = game.dungeon().start_neighbors()[0];
    game.update(&move_to(&game, first_room)).expect("move");
    game.update(&Command::Pickup).expect("pickup");
    assert_ne!(game.snapshot_hash(), fresh);

    game.reset();
    assert_eq!(game.snapshot_hash(), fresh);
    assert_eq!(game.turn(), 0);
    assert!(game.log().is_empty());
}

#[test]
fn replay_turn_checks_the_turn_number() {
    let (mut game, _) = corridor_game(Difficulty::Normal);
    let late = InputRecord { turn: 3, command: Command::DoNothing };
    assert_eq!(
        game.replay_turn(&late),
        Err(GameError::ReplayOutOfOrder { expected: 0, found: 3 })
    );
    game.replay_turn(&InputRecord { turn: 0, command: Command::DoNothing }).expect("turn 0");
    assert_eq!(game.turn(), 1);
}

#[test]
fn same_seed_same_commands_same_hash() {
    let run = || {
        let mut game = Game::new(&GameConfiguration::default(), 31).expect("game");
        for _ in 0..10 {
            if game.is_over() {
                break;
            }
            game.update(&Command::DoNothing).expect("wait");
        }
        game.snapshot_hash()
    };
    assert_eq!(run(), run());
}

#[test]
fn autopilot_fights_through_to_the_exit() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    add_goblin(&mut game, rooms[2]);
    let potion = give_item(&mut game, HEAL);

    for _ in 0..100 {
        if game.is_over() {
            break;
        }
        let command = game.autopilot_command();
        game.update(&command).expect("autopilot only suggests legal commands");
    }

    assert_eq!(game.outcome(), Some(RunOutcome::Victory));
    assert!(game.turn() <= 6, "took {} turns", game.turn());
    assert!(game.dungeon().item_by_id(&potion).is_some(), "no need to heal against one goblin");
}

#[test]
fn autopilot_heals_before_a_fatal_round() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    add_goblin(&mut game, rooms[1]);
    place_player(&mut game, rooms[1]);
    let potion = give_item(&mut game, HEAL);
    game.dungeon.creatures[game.player].hp = 1;

    assert_eq!(game.autopilot_command(), Command::Use { item: potion });
}

/// Creatures other than the player that acted in `events`, sorted by key.
fn monster_actors(events: &[LogEvent], player: CreatureKey) -> Vec<CreatureKey> {
    let mut actors: Vec<CreatureKey> = events
        .iter()
        .filter_map(|event| match *event {
            LogEvent::Moved { creature, .. }
            | LogEvent::Fled { creature, .. }
            | LogEvent::Idle { creature } => Some(creature),
            LogEvent::Attacked { attacker, .. } => Some(attacker),
            _ => None,
        })
        .filter(|actor| *actor != player)
        .collect();
    actors.sort();
    actors
}

#[test]
fn monster_away_from_the_player_does_not_flee() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    let goblin = add_goblin(&mut game, rooms[2]);
    let before = game.snapshot_hash();

    assert_eq!(game.flee(goblin), Ok(false));
    assert_eq!(game.dungeon().creature(goblin).expect("goblin").room, rooms[2]);
    assert_eq!(game.snapshot_hash(), before);
}

#[test]
fn boxed_in_monster_stays_put() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    let goblin = add_goblin(&mut game, rooms[2]);
    for room in [rooms[1], rooms[1], rooms[3], rooms[3]] {
        add_goblin(&mut game, room);
    }
    place_player(&mut game, rooms[2]);
    let before = game.snapshot_hash();

    assert_eq!(game.flee(goblin), Ok(false));
    assert_eq!(game.dungeon().creature(goblin).expect("goblin").room, rooms[2]);
    assert_eq!(game.snapshot_hash(), before);

    game.dungeon.creatures[goblin].alive = false;
    assert!(matches!(game.flee(goblin), Err(GameError::IllegalAction(_))));
}

#[test]
fn monsters_with_nowhere_to_go_idle() {
    let (mut game, rooms) = corridor_game(Difficulty::Normal);
    for room in [rooms[1], rooms[1], rooms[2], rooms[2], rooms[3], rooms[3]] {
        add_goblin(&mut game, room);
    }
    let player = game.player_key();
    let placement: Vec<(CreatureKey, RoomKey)> = game
        .dungeon()
        .creatures()
        .filter(|creature| !creature.is_player())
        .map(|creature| (creature.key, creature.room))
        .collect();

    for _ in 0..10 {
        let seen = game.log().len();
        game.update(&Command::DoNothing).expect("wait in the start room");
        let monster_events: Vec<&LogEvent> = game.log()[seen..]
            .iter()
            .filter(|event| **event != LogEvent::Idle { creature: player })
            .collect();
        assert_eq!(monster_events.len(), placement.len());
        assert!(monster_events.iter().all(|event| matches!(event, LogEvent::Idle { .. })));
    }
    for (monster, room) in placement {
        let creature = game.dungeon().creature(monster).expect("monster");
        assert_eq!(creature.room, room);
        assert_eq!(creature.last_action, Some(CommandKind::DoNothing));
    }
}

#[test]
fn every_live_monster_acts_exactly_once_per_turn() {
    for seed in [3, 31, 77] {
        let mut game = Game::new(&GameConfiguration::default(), seed).expect("game");
        let player = game.player_key();
        for _ in 0..40 {
            if game.is_over() {
                break;
            }
            let seen = game.log().len();
            let command = game.autopilot_command();
            game.update(&command).expect("autopilot only suggests legal commands");
            if !game.player().alive {
                break;
            }
            assert_eq!(
                monster_actors(&game.log()[seen..], player),
                game.live_monsters(),
                "seed {seed}, turn {}",
                game.turn()
            );
        }
    }
}
