//! Room-graph topologies: linear chain, binary tree, and rewired chain.

use crate::context::SimContext;
use crate::dungeon::Dungeon;
use crate::ids::IdCategory;
use crate::types::{DungeonShape, GameError, RoomKey, RoomRole};

pub const MIN_LINEAR_ROOMS: usize = 3;
/// Below four rooms the exit would hang directly off the start room.
pub const MIN_TREE_ROOMS: usize = 4;
/// Rewiring needs at least three ordinary rooms so both halves are non-empty.
pub const MIN_RANDOM_ROOMS: usize = 5;

pub fn generate(
    shape: DungeonShape,
    room_count: usize,
    capacity_ceiling: usize,
    context: &mut SimContext,
) -> Result<Dungeon, GameError> {
    let minimum = match shape {
        DungeonShape::Linear => MIN_LINEAR_ROOMS,
        DungeonShape::Tree => MIN_TREE_ROOMS,
        DungeonShape::Random => MIN_RANDOM_ROOMS,
    };
    if room_count < minimum {
        return Err(GameError::InvalidConfiguration(format!(
            "{shape:?} dungeon needs at least {minimum} rooms, got {room_count}"
        )));
    }
    if capacity_ceiling < 1 {
        return Err(GameError::InvalidConfiguration(
            "room capacity ceiling must be at least 1".to_string(),
        ));
    }

    let dungeon = match shape {
        DungeonShape::Linear => linear(room_count, capacity_ceiling, context)?.0,
        DungeonShape::Tree => tree(room_count, capacity_ceiling, context)?,
        DungeonShape::Random => rewired(room_count, capacity_ceiling, context)?,
    };
    dungeon.validate()?;
    log::debug!(
        "generated {shape:?} dungeon with {} rooms (ceiling {capacity_ceiling})",
        dungeon.room_count()
    );
    Ok(dungeon)
}

fn add_room(
    dungeon: &mut Dungeon,
    context: &mut SimContext,
    role: RoomRole,
    capacity_ceiling: usize,
) -> Result<RoomKey, GameError> {
    let capacity = match role {
        RoomRole::Start | RoomRole::Exit => 0,
        RoomRole::Ordinary => context.rng.range_inclusive(1, capacity_ceiling),
    };
    let id = context.ids.next(IdCategory::Room);
    dungeon.add_room(id, role, capacity)
}

/// Start, ordinary rooms, exit, each connected to the next. Also returns the
/// chain order for the rewiring pass.
fn linear(
    room_count: usize,
    capacity_ceiling: usize,
    context: &mut SimContext,
) -> Result<(Dungeon, Vec<RoomKey>), GameError> {
    let mut dungeon = Dungeon::new();
    let mut chain = Vec::with_capacity(room_count);
    chain.push(add_room(&mut dungeon, context, RoomRole::Start, capacity_ceiling)?);
    for _ in 0..room_count - 2 {
        chain.push(add_room(&mut dungeon, context, RoomRole::Ordinary, capacity_ceiling)?);
    }
    chain.push(add_room(&mut dungeon, context, RoomRole::Exit, capacity_ceiling)?);

    for pair in chain.windows(2) {
        dungeon.connect(pair[0], pair[1])?;
    }
    Ok((dungeon, chain))
}

/// Heap-indexed binary tree: room `i` links to `2i + 1` and `2i + 2`.
fn tree(
    room_count: usize,
    capacity_ceiling: usize,
    context: &mut SimContext,
) -> Result<Dungeon, GameError> {
    let mut dungeon = Dungeon::new();
    let mut nodes = Vec::with_capacity(room_count);
    for index in 0..room_count {
        let role = if index == 0 {
            RoomRole::Start
        } else if index == room_count - 1 {
            RoomRole::Exit
        } else {
            RoomRole::Ordinary
        };
        nodes.push(add_room(&mut dungeon, context, role, capacity_ceiling)?);
    }

    for parent in 0..room_count {
        for child in [2 * parent + 1, 2 * parent + 2] {
            if child < room_count {
                dungeon.connect(nodes[parent], nodes[child])?;
            }
        }
    }
    Ok(dungeon)
}

/// Linear chain plus `room_count / 3` chords from the first half of the
/// ordinary rooms to the second half. Chords skip at least one room, so every
/// one of them closes a cycle; none touches start or exit.
fn rewired(
    room_count: usize,
    capacity_ceiling: usize,
    context: &mut SimContext,
) -> Result<Dungeon, GameError> {
    let (mut dungeon, chain) = linear(room_count, capacity_ceiling, context)?;
    let ordinary = &chain[1..chain.len() - 1];
    let half = ordinary.len() / 2;
    let upper_len = ordinary.len() - (half + 1);

    for _ in 0..room_count / 3 {
        let low = context.rng.below(half);
        let high = half + 1 + context.rng.below(upper_len);
        dungeon.connect(ordinary[low], ordinary[high])?;
    }
    Ok(dungeon)
}
