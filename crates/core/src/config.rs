//! Per-session game parameters, consumed once by `Game::new`.

use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, DungeonShape};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfiguration {
    pub number_of_rooms: usize,
    pub max_room_capacity: usize,
    pub dungeon_shape: DungeonShape,
    pub initial_number_of_monsters: usize,
    pub initial_number_of_healing_pots: usize,
    pub initial_number_of_rage_pots: usize,
    pub difficulty_mode: Difficulty,
    pub player_name: String,
    pub player_base_hp: i32,
    pub player_base_ar: i32,
    pub monster_hp: i32,
    pub monster_ar: i32,
    pub healing_potion_potency: i32,
}

impl Default for GameConfiguration {
    fn default() -> Self {
        Self {
            number_of_rooms: 8,
            max_room_capacity: 3,
            dungeon_shape: DungeonShape::Linear,
            initial_number_of_monsters: 1,
            initial_number_of_healing_pots: 2,
            initial_number_of_rage_pots: 1,
            difficulty_mode: Difficulty::Normal,
            player_name: "player".to_string(),
            player_base_hp: 10,
            player_base_ar: 1,
            monster_hp: 3,
            monster_ar: 1,
            healing_potion_potency: 5,
        }
    }
}

impl GameConfiguration {
    pub fn player_hp(&self) -> i32 {
        self.player_base_hp * self.difficulty_mode.multiplier()
    }

    pub fn player_ar(&self) -> i32 {
        self.player_base_ar * self.difficulty_mode.multiplier()
    }
}
