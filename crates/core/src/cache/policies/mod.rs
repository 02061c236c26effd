//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim lines in a full set.
//! Policies are stateless strategies: all per-set state (recency order,
//! mark bits) lives in the [`CacheSet`] they are handed.
//!
//! # Policies
//!
//! - `Random`: Uniform random selection.
//! - `Lru`: Least Recently Used.
//! - `Mru`: Most Recently Used (by installation).
//! - `Marking`: Randomized marking.

/// Least Recently Used replacement policy.
pub mod lru;

/// Randomized marking replacement policy.
pub mod marking;

/// Most Recently Used replacement policy.
pub mod mru;

/// Random replacement policy.
pub mod random;

pub use lru::LruPolicy;
pub use marking::MarkingPolicy;
pub use mru::MruPolicy;
pub use random::RandomPolicy;

use super::set::CacheSet;
use crate::config::ReplacementPolicy as PolicyType;
use crate::rng::RandomSource;

/// Trait for cache replacement policies.
///
/// Defines the hooks the access engine calls on hits and installs, and
/// victim selection for a full set.
pub trait ReplacementPolicy: Send + Sync + std::fmt::Debug {
    /// Updates the set's policy state when `way` hits.
    ///
    /// # Arguments
    ///
    /// * `set` - The set that was accessed.
    /// * `way` - The way index within the set that hit.
    fn update(&self, _set: &mut CacheSet, _way: usize) {}

    /// Updates the set's policy state after a block is installed in `way`.
    ///
    /// Called for free-slot fills and evictions alike.
    fn install(&self, _set: &mut CacheSet, _way: usize) {}

    /// Selects the way to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The set to choose from; every line is valid.
    /// * `rng` - Caller-supplied randomness.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&self, set: &mut CacheSet, rng: &mut dyn RandomSource) -> usize;
}

/// Builds the policy object for a configured policy type.
pub fn for_kind(kind: PolicyType) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyType::Random => Box::new(RandomPolicy),
        PolicyType::Lru => Box::new(LruPolicy),
        PolicyType::Mru => Box::new(MruPolicy),
        PolicyType::RandomizedMarking => Box::new(MarkingPolicy),
    }
}
