//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! Every hit and every install moves the way to the back of the set's recency
//! order; the front of the order is the Least Recently Used line.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::ReplacementPolicy;
use crate::cache::set::CacheSet;
use crate::rng::RandomSource;

/// LRU Policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    /// Moves the hit way to the MRU position.
    fn update(&self, set: &mut CacheSet, way: usize) {
        set.make_most_recently_used(way);
    }

    /// Moves the freshly installed way to the MRU position.
    fn install(&self, set: &mut CacheSet, way: usize) {
        set.make_most_recently_used(way);
    }

    /// Returns the way at the front of the recency order (LRU position).
    fn get_victim(&self, set: &mut CacheSet, _rng: &mut dyn RandomSource) -> usize {
        set.least_recently_used()
    }
}
