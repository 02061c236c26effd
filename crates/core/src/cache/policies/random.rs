//! Random Replacement Policy.
//!
//! This policy evicts a uniformly random cache line from the set. The
//! random number comes from the caller's [`RandomSource`], so a
//! deterministic source gives a deterministic eviction sequence.

use super::ReplacementPolicy;
use crate::cache::set::CacheSet;
use crate::rng::{RandomSource, choose_index};

/// Random Policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl ReplacementPolicy for RandomPolicy {
    /// Returns `random() % associativity`.
    fn get_victim(&self, set: &mut CacheSet, rng: &mut dyn RandomSource) -> usize {
        choose_index(rng, set.associativity())
    }
}
