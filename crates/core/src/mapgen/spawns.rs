//! Monster and potion placement under the dungeon balance rules.
//!
//! Placement is planned against the untouched dungeon, then committed to a
//! staged copy that replaces the original only once it validates. A failed
//! population therefore never leaves monsters or items behind.

use std::collections::BTreeMap;
use std::iter;

use crate::context::SimContext;
use crate::dungeon::Dungeon;
use crate::ids::IdCategory;
use crate::state::ItemKind;
use crate::types::{GameError, RoomKey, RoomRole};

const MONSTER_NAME: &str = "goblin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopulationRequest {
    pub monsters: usize,
    pub healing_potions: usize,
    pub rage_potions: usize,
    pub monster_hp: i32,
    pub monster_ar: i32,
    pub heal_value: i32,
}

impl PopulationRequest {
    pub fn new(monsters: usize, healing_potions: usize, rage_potions: usize) -> Self {
        Self {
            monsters,
            healing_potions,
            rage_potions,
            monster_hp: 3,
            monster_ar: 1,
            heal_value: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error(
        "at least one healing and one rage potion are required \
         (got {healing_potions} healing, {rage_potions} rage)"
    )]
    MissingPotions { healing_potions: usize, rage_potions: usize },
    #[error("{requested} monsters cannot guard the {required} rooms next to the exit")]
    TooFewMonsters { requested: usize, required: usize },
    #[error("room {room} next to the exit has no capacity for a guard")]
    UnguardableExit { room: String },
    #[error("{requested} monsters requested but at most {max_placeable} can be placed")]
    OverCapacity { requested: usize, max_placeable: usize },
    #[error("no ordinary room next to the start can hold the first potions")]
    NoStartAdjacentRoom,
    #[error("{ordinary_rooms} ordinary rooms cannot keep half of them free of items")]
    NoItemRooms { ordinary_rooms: usize },
    #[error(transparent)]
    Placement(#[from] GameError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulationReport {
    pub monsters_per_room: BTreeMap<RoomKey, usize>,
    pub item_rooms: Vec<RoomKey>,
    pub max_placeable: usize,
}

/// Lowest capacity among exit's neighbors, start excluded.
fn lowest_exit_neighbor_capacity(dungeon: &Dungeon) -> Option<usize> {
    dungeon
        .exit_neighbors()
        .into_iter()
        .filter_map(|key| dungeon.room(key).map(|room| room.capacity))
        .min()
}

/// How many monsters `room` may receive during seeding. Exit neighbors may
/// fill up; every other ordinary room stays strictly below the weakest exit
/// neighbor.
fn seeding_quota(dungeon: &Dungeon, room: RoomKey, lowest: Option<usize>) -> usize {
    let Some(target) = dungeon.room(room) else {
        return 0;
    };
    match target.role {
        RoomRole::Start | RoomRole::Exit => 0,
        RoomRole::Ordinary if dungeon.is_exit_adjacent(room) => target.capacity,
        RoomRole::Ordinary => match lowest {
            Some(lowest) => target.capacity.min(lowest.saturating_sub(1)),
            None => target.capacity,
        },
    }
}

pub fn max_placeable_monsters(dungeon: &Dungeon) -> usize {
    let lowest = lowest_exit_neighbor_capacity(dungeon);
    dungeon.rooms().map(|room| seeding_quota(dungeon, room.key, lowest)).sum()
}

/// Populate `dungeon`, returning `true` only if every rule holds afterwards.
pub fn seed(dungeon: &mut Dungeon, context: &mut SimContext, request: &PopulationRequest) -> bool {
    match populate(dungeon, context, request) {
        Ok(_) => true,
        Err(error) => {
            log::debug!("population rejected: {error}");
            false
        }
    }
}

pub fn populate(
    dungeon: &mut Dungeon,
    context: &mut SimContext,
    request: &PopulationRequest,
) -> Result<PopulationReport, PopulationError> {
    if request.healing_potions < 1 || request.rage_potions < 1 {
        return Err(PopulationError::MissingPotions {
            healing_potions: request.healing_potions,
            rage_potions: request.rage_potions,
        });
    }

    let exit_neighbors = dungeon.exit_neighbors();
    if request.monsters < exit_neighbors.len() {
        return Err(PopulationError::TooFewMonsters {
            requested: request.monsters,
            required: exit_neighbors.len(),
        });
    }
    if let Some(room) = exit_neighbors
        .iter()
        .filter_map(|key| dungeon.room(*key))
        .find(|room| room.role != RoomRole::Ordinary || room.capacity == 0)
    {
        return Err(PopulationError::UnguardableExit { room: room.id.clone() });
    }

    let max_placeable = max_placeable_monsters(dungeon);
    if request.monsters > max_placeable {
        return Err(PopulationError::OverCapacity { requested: request.monsters, max_placeable });
    }

    let start_candidates: Vec<RoomKey> = dungeon
        .start_neighbors()
        .into_iter()
        .filter(|key| dungeon.room(*key).is_some_and(|room| room.role == RoomRole::Ordinary))
        .collect();
    if start_candidates.is_empty() {
        return Err(PopulationError::NoStartAdjacentRoom);
    }
    let ordinary = dungeon.ordinary_rooms();
    let item_room_limit = ordinary.len() / 2;
    if item_room_limit < 1 {
        return Err(PopulationError::NoItemRooms { ordinary_rooms: ordinary.len() });
    }

    let monsters_per_room = plan_monsters(dungeon, context, request.monsters, &exit_neighbors)?;
    let item_plan =
        plan_items(context, request, &start_candidates, &ordinary, item_room_limit);

    let mut staged = dungeon.clone();
    for (&room, &count) in &monsters_per_room {
        for _ in 0..count {
            let id = context.ids.next(IdCategory::Creature);
            staged.spawn_monster(id, MONSTER_NAME, (request.monster_hp, request.monster_ar), room)?;
        }
    }
    for (room, kind) in &item_plan.placements {
        let id = context.ids.next(IdCategory::Item);
        staged.spawn_item(id, *kind, *room)?;
    }
    staged.validate()?;
    *dungeon = staged;

    log::debug!(
        "seeded {} monsters and {} potions across {} item rooms",
        request.monsters,
        item_plan.placements.len(),
        item_plan.rooms.len()
    );
    Ok(PopulationReport { monsters_per_room, item_rooms: item_plan.rooms, max_placeable })
}

/// One guard per exit neighbor, then exit neighbors until full, then the
/// remaining ordinary rooms up to their quota. Each extra monster goes to a
/// uniformly chosen room that still has room for it.
fn plan_monsters(
    dungeon: &Dungeon,
    context: &mut SimContext,
    monsters: usize,
    exit_neighbors: &[RoomKey],
) -> Result<BTreeMap<RoomKey, usize>, PopulationError> {
    let lowest = lowest_exit_neighbor_capacity(dungeon);
    let mut plan: BTreeMap<RoomKey, usize> = exit_neighbors.iter().map(|key| (*key, 1)).collect();
    let mut remaining = monsters - exit_neighbors.len();

    let others: Vec<RoomKey> = dungeon
        .ordinary_rooms()
        .into_iter()
        .filter(|key| !dungeon.is_exit_adjacent(*key))
        .collect();

    for tier in [exit_neighbors, others.as_slice()] {
        while remaining > 0 {
            let open: Vec<RoomKey> = tier
                .iter()
                .copied()
                .filter(|key| {
                    plan.get(key).copied().unwrap_or(0) < seeding_quota(dungeon, *key, lowest)
                })
                .collect();
            let Some(&room) = context.rng.choose(&open) else {
                break;
            };
            *plan.entry(room).or_insert(0) += 1;
            remaining -= 1;
        }
    }

    if remaining > 0 {
        return Err(PopulationError::OverCapacity {
            requested: monsters,
            max_placeable: monsters - remaining,
        });
    }
    plan.retain(|_, count| *count > 0);
    Ok(plan)
}

struct ItemPlan {
    rooms: Vec<RoomKey>,
    placements: Vec<(RoomKey, ItemKind)>,
}

/// A healing and a rage potion next to the start, the rest spread round-robin
/// over at most `item_room_limit` rooms.
fn plan_items(
    context: &mut SimContext,
    request: &PopulationRequest,
    start_candidates: &[RoomKey],
    ordinary: &[RoomKey],
    item_room_limit: usize,
) -> ItemPlan {
    let heal = ItemKind::HealingPotion { heal: request.heal_value };
    let first_room = start_candidates[context.rng.below(start_candidates.len())];
    let mut placements = vec![(first_room, heal), (first_room, ItemKind::RagePotion)];

    let leftovers: Vec<ItemKind> = iter::repeat_n(heal, request.healing_potions - 1)
        .chain(iter::repeat_n(ItemKind::RagePotion, request.rage_potions - 1))
        .collect();

    let mut pool: Vec<RoomKey> =
        ordinary.iter().copied().filter(|key| *key != first_room).collect();
    let extra_rooms = (item_room_limit - 1).min(pool.len()).min(leftovers.len());
    let mut rooms = vec![first_room];
    for _ in 0..extra_rooms {
        let index = context.rng.below(pool.len());
        rooms.push(pool.remove(index));
    }

    if !leftovers.is_empty() {
        let offset = context.rng.below(rooms.len());
        for (index, kind) in leftovers.into_iter().enumerate() {
            placements.push((rooms[(offset + index) % rooms.len()], kind));
        }
    }

    ItemPlan { rooms, placements }
}
