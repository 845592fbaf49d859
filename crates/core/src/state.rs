use std::collections::BTreeSet;

use crate::types::*;

#[derive(Clone, Debug)]
pub struct Room {
    pub key: RoomKey,
    pub id: String,
    pub role: RoomRole,
    /// Maximum number of monsters that may occupy the room at once.
    pub capacity: usize,
    pub(crate) neighbors: BTreeSet<RoomKey>,
    pub(crate) monsters: BTreeSet<CreatureKey>,
    pub(crate) items: BTreeSet<ItemKey>,
}

impl Room {
    pub fn neighbors(&self) -> impl Iterator<Item = RoomKey> + '_ {
        self.neighbors.iter().copied()
    }

    pub fn is_neighbor(&self, other: RoomKey) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn monsters(&self) -> impl Iterator<Item = CreatureKey> + '_ {
        self.monsters.iter().copied()
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn items(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.items.iter().copied()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_spare_capacity(&self) -> bool {
        self.monsters.len() < self.capacity
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub kill_points: u32,
    pub inventory: Vec<ItemKey>,
    pub enraged: bool,
    /// Elite difficulty only: whether an enraged player may still flee from
    /// next to the exit.
    pub elite_flee: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreatureRole {
    Player(PlayerState),
    Monster,
}

#[derive(Clone, Debug)]
pub struct Creature {
    pub key: CreatureKey,
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub hp_max: i32,
    pub attack: i32,
    pub alive: bool,
    pub room: RoomKey,
    pub last_action: Option<CommandKind>,
    pub role: CreatureRole,
}

impl Creature {
    pub fn is_player(&self) -> bool {
        matches!(self.role, CreatureRole::Player(_))
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.role {
            CreatureRole::Player(state) => Some(state),
            CreatureRole::Monster => None,
        }
    }

    pub(crate) fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.role {
            CreatureRole::Player(state) => Some(state),
            CreatureRole::Monster => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    HealingPotion { heal: i32 },
    RagePotion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemLocation {
    Room(RoomKey),
    Inventory,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub key: ItemKey,
    pub id: String,
    pub kind: ItemKind,
    pub location: ItemLocation,
}
