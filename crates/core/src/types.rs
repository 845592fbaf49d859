use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct RoomKey;
    pub struct CreatureKey;
    pub struct ItemKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomRole {
    Start,
    Exit,
    Ordinary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DungeonShape {
    Linear,
    Tree,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Newbie,
    Normal,
    Elite,
}

impl Difficulty {
    /// Factor applied to the player's base HP and attack rating.
    pub fn multiplier(self) -> i32 {
        match self {
            Self::Newbie => 3,
            Self::Normal => 2,
            Self::Elite => 1,
        }
    }
}

/// One player action for one turn. Targets are the string ids handed out by the
/// `IdAllocator`, so a command can be typed, logged and replayed verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move { room: String },
    Attack { target: String },
    Use { item: String },
    Pickup,
    Flee,
    DoNothing,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Move { .. } => CommandKind::Move,
            Self::Attack { .. } => CommandKind::Attack,
            Self::Use { .. } => CommandKind::Use,
            Self::Pickup => CommandKind::Pickup,
            Self::Flee => CommandKind::Flee,
            Self::DoNothing => CommandKind::DoNothing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Move,
    Attack,
    Use,
    Pickup,
    Flee,
    DoNothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Active,
    GameOver(RunOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("illegal action: {0}")]
    IllegalAction(String),
    #[error("item not owned: {0}")]
    ItemNotOwned(String),
    #[error("not in combat: no monster shares the player's room")]
    NotInCombat,
    #[error("recorded action is for turn {found}, game is at turn {expected}")]
    ReplayOutOfOrder { expected: u64, found: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemUse {
    Healed { amount: i32 },
    Enraged,
    NoEffect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    Moved { creature: CreatureKey, from: RoomKey, to: RoomKey },
    Attacked { attacker: CreatureKey, defender: CreatureKey, damage: i32 },
    Died { creature: CreatureKey },
    ItemUsed { item: ItemKey, effect: ItemUse },
    PickedUp { items: Vec<ItemKey> },
    Fled { creature: CreatureKey, to: RoomKey },
    FleeBlocked { creature: CreatureKey },
    Idle { creature: CreatureKey },
    RageExpired,
    GameOver(RunOutcome),
}
