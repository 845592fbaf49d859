use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rogue_core::journal_file::{JournalWriter, load_journal_from_file, recover_journal_from_file};
use rogue_core::replay::{Replay, replay_journal_inputs, replay_to_end};
use rogue_core::verify::predicates;
use rogue_core::{Game, GameConfiguration, InputJournal, Judgement, TemporalSpec};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

mod shell;

use shell::{HELP, ShellInput};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game from the terminal
    Play {
        /// TOML game configuration; missing keys use the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value_t = 1234)]
        seed: u64,
        /// Record every accepted turn to this JSONL journal
        #[arg(short, long)]
        record: Option<PathBuf>,
        /// Let the autopilot play the whole game
        #[arg(long)]
        auto: bool,
        #[arg(long, default_value_t = 1000)]
        max_turns: u64,
    },
    /// Replay a recorded journal and print the final state
    Replay {
        #[arg(short, long)]
        journal: PathBuf,
        /// Keep the valid prefix of a damaged journal instead of failing
        #[arg(long)]
        recover: bool,
    },
    /// Check the standing game laws on every state of a recorded journal
    Verify {
        #[arg(short, long)]
        journal: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Play { config, seed, record, auto, max_turns } => {
            let config = load_config(config.as_deref())?;
            play(&config, seed, record.as_deref(), auto, max_turns)
        }
        Commands::Replay { journal, recover } => replay(&journal, recover),
        Commands::Verify { journal } => verify(&journal),
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfiguration> {
    let Some(path) = path else {
        return Ok(GameConfiguration::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config: {}", path.display()))
}

fn load_journal(path: &Path, recover: bool) -> Result<InputJournal> {
    if !recover {
        let loaded = load_journal_from_file(path)
            .with_context(|| format!("Failed to load journal: {}", path.display()))?;
        return Ok(loaded.journal);
    }
    let (loaded, problem) = recover_journal_from_file(path)
        .with_context(|| format!("Failed to load journal: {}", path.display()))?;
    if let Some(problem) = problem {
        log::warn!("{problem}; keeping the {} valid records", loaded.journal.inputs.len());
    }
    Ok(loaded.journal)
}

fn play(
    config: &GameConfiguration,
    seed: u64,
    record: Option<&Path>,
    auto: bool,
    max_turns: u64,
) -> Result<()> {
    let mut game = Game::new(config, seed).context("Failed to build the dungeon")?;
    let mut writer = record
        .map(|path| {
            JournalWriter::create(path, seed, env!("CARGO_PKG_VERSION"), config)
                .with_context(|| format!("Failed to create journal: {}", path.display()))
        })
        .transpose()?;

    print_status(&game);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !game.is_over() && game.turn() < max_turns {
        let command = if auto {
            game.autopilot_command()
        } else {
            print!("turn {}> ", game.turn());
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            match shell::parse_line(&line?) {
                Ok(ShellInput::Turn(command)) => command,
                Ok(ShellInput::Auto) => game.autopilot_command(),
                Ok(ShellInput::Status) => {
                    print_status(&game);
                    continue;
                }
                Ok(ShellInput::Help) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(ShellInput::Quit) => break,
                Err(message) => {
                    println!("{message}");
                    continue;
                }
            }
        };

        let turn = game.turn();
        let seen = game.log().len();
        if let Err(error) = game.update(&command) {
            println!("rejected: {error}");
            if auto {
                bail!("autopilot command {command:?} was rejected: {error}");
            }
            continue;
        }
        if let Some(writer) = writer.as_mut() {
            writer.append(turn, &command).context("Failed to append to journal")?;
        }
        for event in &game.log()[seen..] {
            println!("  {event:?}");
        }
        if auto {
            print_status(&game);
        }
    }

    match game.outcome() {
        Some(outcome) => println!("Game over after {} turns: {outcome:?}", game.turn()),
        None => println!("Stopped at turn {}.", game.turn()),
    }
    let kill_points = game.player_state().map_or(0, |state| state.kill_points);
    println!("Kill points: {kill_points}");
    println!("Snapshot Hash: {}", game.snapshot_hash());
    Ok(())
}

fn print_status(game: &Game) {
    let dungeon = game.dungeon();
    let player = game.player();
    let (Some(room), Some(state)) = (dungeon.room(player.room), game.player_state()) else {
        return;
    };
    let names = |ids: Vec<String>| if ids.is_empty() { "-".to_string() } else { ids.join(" ") };

    let neighbors =
        room.neighbors().filter_map(|key| dungeon.room(key)).map(|r| r.id.clone()).collect();
    let monsters = dungeon
        .monsters_in(room.key)
        .into_iter()
        .filter_map(|key| dungeon.creature(key))
        .map(|m| format!("{}({}hp)", m.id, m.hp))
        .collect();
    let loot = room.items().filter_map(|key| dungeon.item(key)).map(|i| i.id.clone()).collect();
    let inventory = state
        .inventory
        .iter()
        .filter_map(|key| dungeon.item(*key))
        .map(|item| format!("{}:{:?}", item.id, item.kind))
        .collect();

    println!(
        "{} in {} ({:?}) hp {}/{} kp {}{}",
        player.id,
        room.id,
        room.role,
        player.hp,
        player.hp_max,
        state.kill_points,
        if state.enraged { " ENRAGED" } else { "" }
    );
    println!("  exits: {}", names(neighbors));
    println!("  monsters: {}", names(monsters));
    println!("  items here: {}", names(loot));
    println!("  inventory: {}", names(inventory));
}

fn replay(path: &Path, recover: bool) -> Result<()> {
    let journal = load_journal(path, recover)?;
    let result = replay_to_end(&journal).context("Replay failed during execution")?;

    println!("Replay complete.");
    println!("Final Turn: {}", result.final_turn);
    println!("Outcome: {:?}", result.final_outcome);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);
    if result.final_outcome.is_none() {
        let game = replay_journal_inputs(&journal).context("Failed to rebuild the game")?;
        print_status(&game);
    }
    Ok(())
}

fn verify(path: &Path) -> Result<()> {
    let journal = load_journal(path, false)?;
    let mut replay = Replay::new(journal).context("Failed to rebuild the recorded game")?;

    let laws = [
        ("rooms within capacity", TemporalSpec::always(predicates::rooms_within_capacity)),
        ("hp within bounds", TemporalSpec::always(predicates::hp_within_bounds)),
        ("dead monsters not live", TemporalSpec::always(predicates::dead_monsters_not_live)),
        (
            "kill points match deaths",
            TemporalSpec::always_change(predicates::kill_points_match_deaths),
        ),
        ("nothing spawns", TemporalSpec::always_change(predicates::nothing_spawns)),
        (
            "flee blocked after heal",
            TemporalSpec::always_change(predicates::flee_blocked_after_heal),
        ),
    ];

    let mut broken = Vec::new();
    for (name, law) in &laws {
        let judgement = law.evaluate(&mut replay).context("Replay failed during verification")?;
        println!("{name}: {judgement:?}");
        if judgement == Judgement::Invalid {
            broken.push(*name);
        }
    }
    if !broken.is_empty() {
        bail!("journal violates: {}", broken.join(", "));
    }
    Ok(())
}
