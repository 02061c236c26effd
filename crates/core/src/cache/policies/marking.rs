//! Randomized Marking Replacement Policy.
//!
//! Every install marks its line. A victim is drawn uniformly from the
//! unmarked lines of the set; when all lines are marked the phase ends,
//! every mark is cleared and the draw is over the whole set.
//!
//! Within one phase no line is evicted twice, so over any run of evictions
//! in a set each line is chosen once before any line is chosen again.

use super::ReplacementPolicy;
use crate::cache::set::CacheSet;
use crate::rng::{RandomSource, choose_index};

/// Randomized marking Policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkingPolicy;

impl ReplacementPolicy for MarkingPolicy {
    /// Marks the freshly installed way.
    fn install(&self, set: &mut CacheSet, way: usize) {
        set.mark(way);
    }

    /// Picks a random unmarked way, starting a new phase if none is left.
    fn get_victim(&self, set: &mut CacheSet, rng: &mut dyn RandomSource) -> usize {
        if set.unmarked_ways().next().is_none() {
            set.clear_marks();
        }

        let candidates = set.unmarked_ways().count();
        debug_assert_eq!(
            candidates,
            set.associativity() - set.marked_count(),
            "marked count out of step with mark bits"
        );
        let pick = choose_index(rng, candidates);
        // pick < candidates, counted over the same unchanged set.
        set.unmarked_ways()
            .nth(pick)
            .unwrap_or_else(|| set.least_recently_used())
    }
}
