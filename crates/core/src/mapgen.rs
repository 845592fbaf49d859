//! Dungeon generation and population, split into layout and spawn rules.

mod layout;
mod spawns;

pub use layout::{MIN_LINEAR_ROOMS, MIN_RANDOM_ROOMS, MIN_TREE_ROOMS, generate};
pub use spawns::{
    PopulationError, PopulationReport, PopulationRequest, max_placeable_monsters, populate, seed,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimContext;
    use crate::types::DungeonShape;

    #[test]
    fn generated_then_seeded_dungeon_stays_valid() {
        for shape in [DungeonShape::Linear, DungeonShape::Tree, DungeonShape::Random] {
            let mut context = SimContext::new(77);
            let mut dungeon = generate(shape, 9, 4, &mut context).expect("dungeon");
            assert!(seed(&mut dungeon, &mut context, &PopulationRequest::new(1, 2, 2)));
            dungeon.validate().expect("valid after seeding");
        }
    }
}
