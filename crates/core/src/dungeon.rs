//! The room graph and everything placed in it.
//!
//! Rooms, creatures and items live in slotmaps owned by the `Dungeon`;
//! creatures point back at their room by `RoomKey` only. Adjacency is
//! symmetric and `connect` is the only way to create an edge.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use slotmap::SlotMap;

use crate::state::{Creature, CreatureRole, Item, ItemKind, ItemLocation, PlayerState, Room};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct Dungeon {
    pub(crate) rooms: SlotMap<RoomKey, Room>,
    pub(crate) creatures: SlotMap<CreatureKey, Creature>,
    pub(crate) items: SlotMap<ItemKey, Item>,
    pub(crate) live_monsters: BTreeSet<CreatureKey>,
    start: Option<RoomKey>,
    exit: Option<RoomKey>,
}

impl Default for Dungeon {
    fn default() -> Self {
        Self::new()
    }
}

impl Dungeon {
    pub fn new() -> Self {
        Self {
            rooms: SlotMap::with_key(),
            creatures: SlotMap::with_key(),
            items: SlotMap::with_key(),
            live_monsters: BTreeSet::new(),
            start: None,
            exit: None,
        }
    }

    pub fn add_room(
        &mut self,
        id: String,
        role: RoomRole,
        capacity: usize,
    ) -> Result<RoomKey, GameError> {
        match role {
            RoomRole::Start if self.start.is_some() => {
                return Err(GameError::InvalidConfiguration("second start room".to_string()));
            }
            RoomRole::Exit if self.exit.is_some() => {
                return Err(GameError::InvalidConfiguration("second exit room".to_string()));
            }
            RoomRole::Start | RoomRole::Exit if capacity != 0 => {
                return Err(GameError::InvalidConfiguration(format!(
                    "{role:?} room {id} must have capacity 0"
                )));
            }
            _ => {}
        }
        if self.room_by_id(&id).is_some() {
            return Err(GameError::InvalidConfiguration(format!("duplicate room id {id}")));
        }

        let key = self.rooms.insert_with_key(|key| Room {
            key,
            id,
            role,
            capacity,
            neighbors: BTreeSet::new(),
            monsters: BTreeSet::new(),
            items: BTreeSet::new(),
        });
        match role {
            RoomRole::Start => self.start = Some(key),
            RoomRole::Exit => self.exit = Some(key),
            RoomRole::Ordinary => {}
        }
        Ok(key)
    }

    /// Add a symmetric edge between two distinct rooms. Connecting rooms that
    /// are already neighbors is a no-op.
    pub fn connect(&mut self, a: RoomKey, b: RoomKey) -> Result<(), GameError> {
        if a == b {
            return Err(GameError::InvalidConfiguration("a room cannot neighbor itself".into()));
        }
        if !self.rooms.contains_key(a) || !self.rooms.contains_key(b) {
            return Err(GameError::InvalidConfiguration("connect on unknown room".to_string()));
        }
        self.rooms[a].neighbors.insert(b);
        self.rooms[b].neighbors.insert(a);
        Ok(())
    }

    pub fn start(&self) -> RoomKey {
        self.start.unwrap_or_default()
    }

    pub fn exit(&self) -> RoomKey {
        self.exit.unwrap_or_default()
    }

    pub fn room(&self, key: RoomKey) -> Option<&Room> {
        self.rooms.get(key)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.values()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_by_id(&self, id: &str) -> Option<RoomKey> {
        self.rooms.iter().find(|(_, room)| room.id == id).map(|(key, _)| key)
    }

    pub fn ordinary_rooms(&self) -> Vec<RoomKey> {
        self.rooms
            .iter()
            .filter(|(_, room)| room.role == RoomRole::Ordinary)
            .map(|(key, _)| key)
            .collect()
    }

    /// Rooms reachable from `from` (including itself), in breadth-first order.
    pub fn reachable_rooms(&self, from: RoomKey) -> Vec<RoomKey> {
        if !self.rooms.contains_key(from) {
            return Vec::new();
        }
        let mut seen = BTreeSet::from([from]);
        let mut order = Vec::new();
        let mut todo = VecDeque::from([from]);
        while let Some(current) = todo.pop_front() {
            order.push(current);
            for next in self.rooms[current].neighbors() {
                if seen.insert(next) {
                    todo.push_back(next);
                }
            }
        }
        order
    }

    pub fn can_reach(&self, from: RoomKey, to: RoomKey) -> bool {
        self.reachable_rooms(from).contains(&to)
    }

    /// First room on a shortest path from `from` to `to`, or `None` when
    /// already there or unreachable. Ties go to the lowest key.
    pub fn next_step_towards(&self, from: RoomKey, to: RoomKey) -> Option<RoomKey> {
        if from == to || !self.rooms.contains_key(to) {
            return None;
        }
        let mut distance = BTreeMap::from([(to, 0usize)]);
        let mut todo = VecDeque::from([to]);
        while let Some(current) = todo.pop_front() {
            let next_distance = distance[&current] + 1;
            for next in self.rooms[current].neighbors() {
                if let Entry::Vacant(slot) = distance.entry(next) {
                    slot.insert(next_distance);
                    todo.push_back(next);
                }
            }
        }
        self.rooms
            .get(from)?
            .neighbors()
            .filter_map(|next| distance.get(&next).map(|steps| (*steps, next)))
            .min()
            .map(|(_, next)| next)
    }

    pub fn is_fully_connected(&self) -> bool {
        self.reachable_rooms(self.start()).len() == self.rooms.len()
    }

    /// Exit's neighbors, never counting the start room.
    pub fn exit_neighbors(&self) -> Vec<RoomKey> {
        self.rooms
            .get(self.exit())
            .map(|exit| exit.neighbors().filter(|key| *key != self.start()).collect())
            .unwrap_or_default()
    }

    /// Start's neighbors, never counting the exit room.
    pub fn start_neighbors(&self) -> Vec<RoomKey> {
        self.rooms
            .get(self.start())
            .map(|start| start.neighbors().filter(|key| *key != self.exit()).collect())
            .unwrap_or_default()
    }

    pub fn is_exit_adjacent(&self, room: RoomKey) -> bool {
        self.rooms.get(room).is_some_and(|room| room.is_neighbor(self.exit()))
    }

    pub fn is_start_adjacent(&self, room: RoomKey) -> bool {
        self.rooms.get(room).is_some_and(|room| room.is_neighbor(self.start()))
    }

    /// Check the structural invariants: one zero-capacity start and exit,
    /// full reachability from start, and no room over capacity.
    pub fn validate(&self) -> Result<(), GameError> {
        let (Some(start), Some(exit)) = (self.start, self.exit) else {
            return Err(GameError::InvalidConfiguration("missing start or exit room".into()));
        };
        if self.rooms[start].capacity != 0 || self.rooms[exit].capacity != 0 {
            return Err(GameError::InvalidConfiguration("start/exit must be empty".into()));
        }
        if !self.is_fully_connected() {
            return Err(GameError::InvalidConfiguration(
                "not every room is reachable from start".into(),
            ));
        }
        if let Some(room) = self.rooms.values().find(|room| room.monsters.len() > room.capacity) {
            return Err(GameError::InvalidConfiguration(format!(
                "room {} holds {} monsters but has capacity {}",
                room.id,
                room.monsters.len(),
                room.capacity
            )));
        }
        Ok(())
    }

    pub fn creature(&self, key: CreatureKey) -> Option<&Creature> {
        self.creatures.get(key)
    }

    /// Player bookkeeping for `key`; `None` for monsters and unknown keys.
    pub fn player_state(&self, key: CreatureKey) -> Option<&PlayerState> {
        self.creatures.get(key).and_then(Creature::player_state)
    }

    pub fn creatures(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.creatures.values()
    }

    pub fn creature_by_id(&self, id: &str) -> Option<CreatureKey> {
        self.creatures.iter().find(|(_, creature)| creature.id == id).map(|(key, _)| key)
    }

    pub fn live_monsters(&self) -> impl Iterator<Item = CreatureKey> + '_ {
        self.live_monsters.iter().copied()
    }

    pub fn live_monster_count(&self) -> usize {
        self.live_monsters.len()
    }

    /// Place a new living monster, respecting the room's capacity.
    pub fn spawn_monster(
        &mut self,
        id: String,
        name: &str,
        stats: (i32, i32),
        room: RoomKey,
    ) -> Result<CreatureKey, GameError> {
        let Some(target) = self.rooms.get(room) else {
            return Err(GameError::IllegalMove(format!("no room for monster {id}")));
        };
        if !target.has_spare_capacity() {
            return Err(GameError::IllegalMove(format!("room {} is full", target.id)));
        }
        let key = self.insert_creature(id, name, stats, room, CreatureRole::Monster)?;
        self.rooms[room].monsters.insert(key);
        self.live_monsters.insert(key);
        Ok(key)
    }

    /// Place the player in `room`. The player never counts toward capacity.
    pub fn spawn_player(
        &mut self,
        id: String,
        name: &str,
        stats: (i32, i32),
        room: RoomKey,
    ) -> Result<CreatureKey, GameError> {
        if !self.rooms.contains_key(room) {
            return Err(GameError::IllegalMove(format!("no room for player {id}")));
        }
        let state = PlayerState { elite_flee: true, ..PlayerState::default() };
        self.insert_creature(id, name, stats, room, CreatureRole::Player(state))
    }

    fn insert_creature(
        &mut self,
        id: String,
        name: &str,
        (hp, attack): (i32, i32),
        room: RoomKey,
        role: CreatureRole,
    ) -> Result<CreatureKey, GameError> {
        if hp <= 0 || attack <= 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "creature {id} needs positive hp and attack, got {hp}/{attack}"
            )));
        }
        Ok(self.creatures.insert_with_key(|key| Creature {
            key,
            id,
            name: name.to_string(),
            hp,
            hp_max: hp,
            attack,
            alive: true,
            room,
            last_action: None,
            role,
        }))
    }

    pub fn item(&self, key: ItemKey) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item_by_id(&self, id: &str) -> Option<ItemKey> {
        self.items.iter().find(|(_, item)| item.id == id).map(|(key, _)| key)
    }

    pub fn spawn_item(
        &mut self,
        id: String,
        kind: ItemKind,
        room: RoomKey,
    ) -> Result<ItemKey, GameError> {
        if !self.rooms.contains_key(room) {
            return Err(GameError::IllegalAction(format!("no room for item {id}")));
        }
        if let ItemKind::HealingPotion { heal } = kind
            && heal <= 0
        {
            return Err(GameError::InvalidConfiguration(format!(
                "healing potion {id} needs a positive heal value, got {heal}"
            )));
        }
        let key = self.items.insert_with_key(|key| Item {
            key,
            id,
            kind,
            location: ItemLocation::Room(room),
        });
        self.rooms[room].items.insert(key);
        Ok(key)
    }
}
