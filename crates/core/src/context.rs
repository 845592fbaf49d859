//! Shared generation/simulation context: the random stream and id allocator.

use crate::ids::IdAllocator;
use crate::rng::RandomSource;

#[derive(Clone, Debug)]
pub struct SimContext {
    pub rng: RandomSource,
    pub ids: IdAllocator,
}

impl SimContext {
    pub fn new(seed: u64) -> Self {
        Self { rng: RandomSource::new(seed), ids: IdAllocator::new() }
    }

    /// Rewind both the stream and the id counters to their initial state.
    pub fn reset(&mut self) {
        self.rng.reset();
        self.ids.reset();
    }
}
