//! Game construction: dungeon generation, population and player placement.
//! This module exists to isolate initialization details from the turn loop.
//! It does not own turn resolution once a game has started.

use super::*;
use crate::ids::IdCategory;
use crate::journal::InputRecord;
use crate::mapgen::{PopulationError, PopulationRequest, generate, populate};

/// Generation plus seeding is retried this many times before giving up.
pub const CONSTRUCTION_ATTEMPTS: u32 = 3;

impl Game {
    /// Build a fresh game from `config`, drawing every random decision from a
    /// stream seeded with `seed`.
    pub fn new(config: &GameConfiguration, seed: u64) -> Result<Self, GameError> {
        let mut context = SimContext::new(seed);
        let (dungeon, player) = build_world(config, &mut context)?;
        log::info!(
            "new game: seed {seed}, {:?} dungeon of {} rooms, {} monsters, {:?}",
            config.dungeon_shape,
            dungeon.room_count(),
            dungeon.live_monster_count(),
            config.difficulty_mode
        );
        Ok(Self::assemble(config.clone(), seed, context, dungeon, player))
    }

    /// Start a game in a dungeon built by hand. The dungeon must pass
    /// validation; the player is placed in its start room.
    pub fn with_dungeon(
        config: &GameConfiguration,
        seed: u64,
        mut dungeon: Dungeon,
    ) -> Result<Self, GameError> {
        dungeon.validate()?;
        let mut context = SimContext::new(seed);
        let player = spawn_player(config, &mut context, &mut dungeon)?;
        Ok(Self::assemble(config.clone(), seed, context, dungeon, player))
    }

    fn assemble(
        config: GameConfiguration,
        seed: u64,
        context: SimContext,
        dungeon: Dungeon,
        player: CreatureKey,
    ) -> Self {
        Self {
            config,
            seed,
            initial_context: context.clone(),
            initial_dungeon: dungeon.clone(),
            context,
            dungeon,
            player,
            turn: 0,
            heal_used_turn: None,
            rage_used_turn: None,
            phase: GamePhase::Active,
            log: Vec::new(),
        }
    }

    /// Return to turn zero with the same dungeon, stream position and ids.
    pub fn reset(&mut self) {
        self.context = self.initial_context.clone();
        self.dungeon = self.initial_dungeon.clone();
        self.turn = 0;
        self.heal_used_turn = None;
        self.rage_used_turn = None;
        self.phase = GamePhase::Active;
        self.log.clear();
    }

    /// Apply one recorded turn. The record must be for the current turn.
    pub fn replay_turn(&mut self, record: &InputRecord) -> Result<(), GameError> {
        if record.turn != self.turn {
            return Err(GameError::ReplayOutOfOrder { expected: self.turn, found: record.turn });
        }
        self.update(&record.command)
    }
}

fn build_world(
    config: &GameConfiguration,
    context: &mut SimContext,
) -> Result<(Dungeon, CreatureKey), GameError> {
    let request = PopulationRequest {
        monsters: config.initial_number_of_monsters,
        healing_potions: config.initial_number_of_healing_pots,
        rage_potions: config.initial_number_of_rage_pots,
        monster_hp: config.monster_hp,
        monster_ar: config.monster_ar,
        heal_value: config.healing_potion_potency,
    };

    let mut last_error = None;
    for attempt in 1..=CONSTRUCTION_ATTEMPTS {
        context.ids.reset();
        let mut dungeon = generate(
            config.dungeon_shape,
            config.number_of_rooms,
            config.max_room_capacity,
            context,
        )?;
        match populate(&mut dungeon, context, &request) {
            Ok(_) => {
                let player = spawn_player(config, context, &mut dungeon)?;
                return Ok((dungeon, player));
            }
            Err(PopulationError::Placement(error)) => return Err(error),
            Err(error) => {
                log::warn!("population attempt {attempt}/{CONSTRUCTION_ATTEMPTS} failed: {error}");
                last_error = Some(error);
            }
        }
    }

    let reason = last_error.map(|error| error.to_string()).unwrap_or_default();
    Err(GameError::InvalidConfiguration(format!(
        "dungeon could not be populated after {CONSTRUCTION_ATTEMPTS} attempts: {reason}"
    )))
}

fn spawn_player(
    config: &GameConfiguration,
    context: &mut SimContext,
    dungeon: &mut Dungeon,
) -> Result<CreatureKey, GameError> {
    let id = loop {
        let candidate = context.ids.next(IdCategory::Creature);
        if dungeon.creature_by_id(&candidate).is_none() {
            break candidate;
        }
    };
    let stats = (config.player_hp(), config.player_ar());
    let start = dungeon.start();
    dungeon.spawn_player(id, &config.player_name, stats, start)
}
