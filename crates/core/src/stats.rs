//! Cache statistics collection and reporting.
//!
//! Counters are owned by the cache instance and only ever increase:
//! 1. **Accesses:** One per `read` or `write` call.
//! 2. **Misses:** At most one per access.
//! 3. **Write-backs:** Dirty lines copied to backing memory on eviction or flush.

use std::fmt;

use serde::Serialize;

/// Hit/miss counters of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of `read`/`write` calls.
    pub accesses: u64,
    /// Number of accesses whose block was not resident.
    pub misses: u64,
    /// Number of dirty lines written back to backing memory.
    pub writebacks: u64,
}

impl CacheStats {
    /// Number of accesses that found their block resident.
    pub const fn hits(&self) -> u64 {
        self.accesses - self.misses
    }

    /// Fraction of accesses that hit, or 0 before the first access.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits() as f64 / self.accesses as f64
        }
    }

    /// Fraction of accesses that missed, or 0 before the first access.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }

    pub(crate) const fn record_access(&mut self) {
        self.accesses += 1;
    }

    pub(crate) const fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) const fn record_writeback(&mut self) {
        self.writebacks += 1;
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  accesses:   {}", self.accesses)?;
        writeln!(f, "  hits:       {}", self.hits())?;
        writeln!(
            f,
            "  misses:     {} ({:.2}%)",
            self.misses,
            self.miss_rate() * 100.0
        )?;
        write!(f, "  writebacks: {}", self.writebacks)
    }
}
