//! Most Recently Used (MRU) Replacement Policy.
//!
//! This policy evicts the cache line that was installed most recently.
//! While counter-intuitive for standard workloads, MRU is optimal for
//! cyclic access patterns (loops) where the dataset is larger than the cache:
//! the newest block is the one needed furthest in the future.
//!
//! Only installs reorder the recency list; hits leave it alone.

use super::ReplacementPolicy;
use crate::cache::set::CacheSet;
use crate::rng::RandomSource;

/// MRU Policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MruPolicy;

impl ReplacementPolicy for MruPolicy {
    /// Moves the freshly installed way to the MRU position.
    fn install(&self, set: &mut CacheSet, way: usize) {
        set.make_most_recently_used(way);
    }

    /// Returns the way at the back of the recency order (the Most Recently Used).
    fn get_victim(&self, set: &mut CacheSet, _rng: &mut dyn RandomSource) -> usize {
        set.most_recently_used()
    }
}
