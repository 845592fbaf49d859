//! The single seeded random stream behind every non-deterministic decision.
//!
//! Generation, seeding, monster behaviour and flee targets all draw from one
//! `RandomSource`, in a fixed order, so the same seed plus the same command
//! sequence always reproduces the same game.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
    draws: u64,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: ChaCha8Rng::seed_from_u64(seed), draws: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn since construction or the last reset.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    pub fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.rng.next_u64()
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as usize
    }

    /// Uniform value in `min_value..=max_value`.
    pub fn range_inclusive(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        min_value + self.below(max_value - min_value + 1)
    }

    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let index = self.below(slice.len());
        slice.get(index)
    }
}
