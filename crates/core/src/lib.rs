pub mod config;
pub mod context;
pub mod creature;
pub mod dungeon;
pub mod game;
pub mod ids;
pub mod items;
pub mod journal;
pub mod journal_file;
pub mod mapgen;
pub mod replay;
pub mod rng;
pub mod state;
pub mod types;
pub mod verify;

pub use config::GameConfiguration;
pub use context::SimContext;
pub use dungeon::Dungeon;
pub use game::Game;
pub use journal::{InputJournal, InputRecord};
pub use replay::*;
pub use state::{Creature, CreatureRole, Item, ItemKind, ItemLocation, PlayerState, Room};
pub use types::*;
pub use verify::{Judgement, TemporalSpec};
