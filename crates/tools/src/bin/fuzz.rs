use anyhow::{Context, Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use rogue_core::verify::predicates;
use rogue_core::{Command, Difficulty, DungeonShape, Game, GameConfiguration};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u64,
    /// Number of games to play, each with the next seed
    #[arg(short, long, default_value_t = 1)]
    games: u64,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_config(rng: &mut ChaCha8Rng) -> GameConfiguration {
    GameConfiguration {
        dungeon_shape: choose(
            rng,
            &[DungeonShape::Linear, DungeonShape::Tree, DungeonShape::Random],
        ),
        difficulty_mode: choose(rng, &[Difficulty::Newbie, Difficulty::Normal, Difficulty::Elite]),
        number_of_rooms: 5 + (rng.next_u64() % 16) as usize,
        max_room_capacity: 1 + (rng.next_u64() % 4) as usize,
        initial_number_of_healing_pots: 1 + (rng.next_u64() % 5) as usize,
        initial_number_of_rage_pots: 1 + (rng.next_u64() % 3) as usize,
        ..GameConfiguration::default()
    }
}

/// Mostly sensible commands, with a share of ones the engine has to reject.
fn random_command(rng: &mut ChaCha8Rng, game: &Game) -> Command {
    let dungeon = game.dungeon();
    let here = game.player_room();
    let neighbors: Vec<String> = dungeon
        .room(here)
        .map(|room| {
            room.neighbors().filter_map(|key| dungeon.room(key)).map(|r| r.id.clone()).collect()
        })
        .unwrap_or_default();
    let foes: Vec<String> = dungeon
        .monsters_in(here)
        .into_iter()
        .filter_map(|key| dungeon.creature(key))
        .map(|monster| monster.id.clone())
        .collect();
    let items: Vec<String> = dungeon.items().map(|item| item.id.clone()).collect();

    match rng.next_u64() % 10 {
        0..=2 if !neighbors.is_empty() => Command::Move { room: choose(rng, &neighbors) },
        3 | 4 if !foes.is_empty() => Command::Attack { target: choose(rng, &foes) },
        5 if !items.is_empty() => Command::Use { item: choose(rng, &items) },
        6 => Command::Pickup,
        7 => Command::Flee,
        8 => Command::Attack { target: game.player().id.clone() },
        _ => Command::DoNothing,
    }
}

fn check_turn(previous: &Game, next: &Game) -> Result<()> {
    if !predicates::rooms_within_capacity(next) {
        bail!("Invariant failed: room over capacity");
    }
    if !predicates::hp_within_bounds(next) {
        bail!("Invariant failed: HP out of bounds");
    }
    if !predicates::dead_monsters_not_live(next) {
        bail!("Invariant failed: dead monster still live");
    }
    if !predicates::kill_points_match_deaths(previous, next) {
        bail!("Invariant failed: kill points do not match deaths");
    }
    if !predicates::nothing_spawns(previous, next) {
        bail!("Invariant failed: something spawned mid-game");
    }
    if !predicates::flee_blocked_after_heal(previous, next) {
        bail!("Invariant failed: fled right after healing");
    }
    Ok(())
}

fn fuzz_one(seed: u64, max_turns: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let config = random_config(&mut rng);
    let mut game = match Game::new(&config, seed) {
        Ok(game) => game,
        Err(error) => {
            println!("seed {seed}: configuration rejected ({error}), skipping");
            return Ok(());
        }
    };

    let mut rejected = 0;
    while !game.is_over() && game.turn() < max_turns {
        let command = random_command(&mut rng, &game);
        let previous = game.clone();
        if game.update(&command).is_err() {
            rejected += 1;
            if game.snapshot_hash() != previous.snapshot_hash() {
                bail!("Invariant failed: rejected {command:?} changed the game");
            }
            continue;
        }
        check_turn(&previous, &game)
            .with_context(|| format!("seed {seed}, turn {}, after {command:?}", previous.turn()))?;
    }

    println!(
        "seed {seed}: {:?} after {} turns ({rejected} rejected commands)",
        game.outcome(),
        game.turn()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!(
        "Starting Fuzz harness on seed {} for {} games of max {} turns...",
        args.seed, args.games, args.turns
    );
    for offset in 0..args.games {
        fuzz_one(args.seed.wrapping_add(offset), args.turns)?;
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
