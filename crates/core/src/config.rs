//! Configuration system for the cache simulator.
//!
//! This module defines the structures and enums used to parameterize a cache. It provides:
//! 1. **Defaults:** Baseline geometry constants (size, line size, associativity).
//! 2. **Policies:** Replacement, write-hit and write-miss policies as orthogonal enums.
//! 3. **Validation:** Construction-time checks that derive a [`CacheGeometry`].
//!
//! Configuration is usually built in code with [`CacheConfig::new`], or
//! deserialized from JSON by a driver.

use serde::Deserialize;

use crate::common::constants::WORD_BYTES;
use crate::common::error::CacheError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default cache size in bytes (4 KiB).
    pub const CACHE_SIZE: usize = 4096;

    /// Default cache line size in bytes (64 bytes).
    ///
    /// Matches typical modern processor cache line sizes and DRAM burst length.
    pub const CACHE_LINE: usize = 64;

    /// Default cache associativity (1 way = direct-mapped).
    pub const CACHE_WAYS: usize = 1;
}

/// Legacy packed encoding of [`CachePolicies`].
///
/// Older drivers pass policies as a single byte; these are the bit layouts
/// they use.
pub mod bits {
    /// Bits holding the replacement policy.
    pub const REPLACEMENT_MASK: u8 = 0b0001_1100;
    /// Random replacement.
    pub const REPLACEMENT_RANDOM: u8 = 0b0000_0000;
    /// Least recently used replacement.
    pub const REPLACEMENT_LRU: u8 = 0b0000_0100;
    /// Most recently used replacement.
    pub const REPLACEMENT_MRU: u8 = 0b0000_1000;
    /// Randomized marking replacement.
    pub const REPLACEMENT_RANDOMIZED_MARKING: u8 = 0b0001_0000;

    /// Bits holding the write policies.
    pub const WRITE_MASK: u8 = 0b0000_0011;
    /// Set for write-back, clear for write-through.
    pub const WRITE_BACK: u8 = 0b0000_0001;
    /// Set for write-no-allocate, clear for write-allocate.
    pub const WRITE_NO_ALLOCATE: u8 = 0b0000_0010;

    /// Set to trace every access.
    pub const TRACE: u8 = 0b0010_0000;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which cache line to evict
/// when a new line must be installed in a full cache set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Random replacement policy.
    ///
    /// Evicts a line chosen uniformly by the caller-supplied random source.
    #[serde(alias = "Random")]
    Random,
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the cache line that was accessed least recently.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Most Recently Used replacement policy.
    ///
    /// Evicts the cache line that was installed most recently.
    /// Effective for cyclic access patterns larger than the cache.
    #[serde(alias = "Mru")]
    Mru,
    /// Randomized marking replacement policy.
    ///
    /// Evicts a random line among those not yet chosen in the current
    /// phase; once every line has been chosen, a new phase begins.
    #[serde(rename = "MARKING", alias = "Marking", alias = "RandomizedMarking")]
    RandomizedMarking,
}

/// What happens to backing memory when a write hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Update the line and backing memory on every write.
    #[default]
    WriteThrough,
    /// Update only the line; backing memory is updated on eviction.
    WriteBack,
}

/// What happens when a write misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocatePolicy {
    /// Fetch the block into the cache, then perform the write as a hit.
    #[default]
    WriteAllocate,
    /// Write straight to backing memory without installing a line.
    NoWriteAllocate,
}

/// The complete policy set of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CachePolicies {
    /// Victim selection in a full set.
    #[serde(default)]
    pub replacement: ReplacementPolicy,

    /// Write-hit behaviour.
    #[serde(default)]
    pub write: WritePolicy,

    /// Write-miss behaviour.
    #[serde(default)]
    pub allocate: AllocatePolicy,

    /// Emit a `tracing` event for every access and eviction.
    #[serde(default)]
    pub trace: bool,
}

impl CachePolicies {
    /// Creates a policy set with tracing disabled.
    pub const fn new(
        replacement: ReplacementPolicy,
        write: WritePolicy,
        allocate: AllocatePolicy,
    ) -> Self {
        Self {
            replacement,
            write,
            allocate,
            trace: false,
        }
    }

    /// Returns a copy with tracing switched on or off.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Decodes the legacy packed policy byte.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] if the replacement bits do not
    /// name a known policy or bits outside the documented fields are set.
    pub fn from_bits(value: u8) -> Result<Self, CacheError> {
        let known = bits::REPLACEMENT_MASK | bits::WRITE_MASK | bits::TRACE;
        if value & !known != 0 {
            return Err(CacheError::invalid(
                "policies",
                format!("has unknown bits set in {value:#010b}"),
            ));
        }

        let replacement = match value & bits::REPLACEMENT_MASK {
            bits::REPLACEMENT_RANDOM => ReplacementPolicy::Random,
            bits::REPLACEMENT_LRU => ReplacementPolicy::Lru,
            bits::REPLACEMENT_MRU => ReplacementPolicy::Mru,
            bits::REPLACEMENT_RANDOMIZED_MARKING => ReplacementPolicy::RandomizedMarking,
            other => {
                return Err(CacheError::invalid(
                    "policies",
                    format!("has unknown replacement policy {other:#010b}"),
                ));
            }
        };

        let write = if value & bits::WRITE_BACK != 0 {
            WritePolicy::WriteBack
        } else {
            WritePolicy::WriteThrough
        };

        let allocate = if value & bits::WRITE_NO_ALLOCATE != 0 {
            AllocatePolicy::NoWriteAllocate
        } else {
            AllocatePolicy::WriteAllocate
        };

        Ok(Self {
            replacement,
            write,
            allocate,
            trace: value & bits::TRACE != 0,
        })
    }

    /// Encodes the policy set into the legacy packed byte.
    pub const fn to_bits(self) -> u8 {
        let mut value = match self.replacement {
            ReplacementPolicy::Random => bits::REPLACEMENT_RANDOM,
            ReplacementPolicy::Lru => bits::REPLACEMENT_LRU,
            ReplacementPolicy::Mru => bits::REPLACEMENT_MRU,
            ReplacementPolicy::RandomizedMarking => bits::REPLACEMENT_RANDOMIZED_MARKING,
        };
        if matches!(self.write, WritePolicy::WriteBack) {
            value |= bits::WRITE_BACK;
        }
        if matches!(self.allocate, AllocatePolicy::NoWriteAllocate) {
            value |= bits::WRITE_NO_ALLOCATE;
        }
        if self.trace {
            value |= bits::TRACE;
        }
        value
    }
}

/// Cache size and policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total cache capacity in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Replacement and write policies
    #[serde(default)]
    pub policies: CachePolicies,
}

/// Geometry derived from a validated [`CacheConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// Number of sets.
    pub num_sets: usize,
    /// Total number of lines (`num_sets * associativity`).
    pub num_lines: usize,
    /// Bytes per line.
    pub line_size: usize,
    /// Lines per set.
    pub associativity: usize,
}

impl CacheGeometry {
    /// Total bytes of line storage.
    pub const fn capacity(&self) -> usize {
        self.num_lines * self.line_size
    }
}

impl CacheConfig {
    /// Creates a configuration from a total size, line size, associativity
    /// and policy set.
    pub const fn new(
        size_bytes: usize,
        line_bytes: usize,
        ways: usize,
        policies: CachePolicies,
    ) -> Self {
        Self {
            size_bytes,
            line_bytes,
            ways,
            policies,
        }
    }

    /// Checks the configuration and derives the cache geometry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] when any size is zero, the total
    /// size or line size is not a power of two, a line cannot hold one word,
    /// the associativity does not evenly divide the line count, or the
    /// resulting set count is not a power of two.
    pub fn validate(&self) -> Result<CacheGeometry, CacheError> {
        if self.size_bytes == 0 {
            return Err(CacheError::invalid("size_bytes", "must be non-zero"));
        }
        if self.line_bytes == 0 {
            return Err(CacheError::invalid("line_bytes", "must be non-zero"));
        }
        if self.ways == 0 {
            return Err(CacheError::invalid("ways", "must be non-zero"));
        }
        if !self.size_bytes.is_power_of_two() {
            return Err(CacheError::invalid(
                "size_bytes",
                format!("must be a power of two, got {}", self.size_bytes),
            ));
        }
        if !self.line_bytes.is_power_of_two() {
            return Err(CacheError::invalid(
                "line_bytes",
                format!("must be a power of two, got {}", self.line_bytes),
            ));
        }
        if self.line_bytes < WORD_BYTES {
            return Err(CacheError::invalid(
                "line_bytes",
                format!(
                    "must hold at least one {WORD_BYTES}-byte word, got {}",
                    self.line_bytes
                ),
            ));
        }
        if self.line_bytes > self.size_bytes {
            return Err(CacheError::invalid(
                "line_bytes",
                format!(
                    "({}) exceeds the cache size ({})",
                    self.line_bytes, self.size_bytes
                ),
            ));
        }

        let num_lines = self.size_bytes / self.line_bytes;
        if num_lines % self.ways != 0 {
            return Err(CacheError::invalid(
                "ways",
                format!("({}) must evenly divide the line count ({num_lines})", self.ways),
            ));
        }

        let num_sets = num_lines / self.ways;
        if !num_sets.is_power_of_two() {
            return Err(CacheError::invalid(
                "ways",
                format!("yields {num_sets} sets, which is not a power of two"),
            ));
        }

        Ok(CacheGeometry {
            num_sets,
            num_lines,
            line_size: self.line_bytes,
            associativity: self.ways,
        })
    }

    /// Returns the default cache size in bytes.
    fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default cache associativity (number of ways).
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration.
    ///
    /// 4 KiB, 64-byte lines, direct-mapped, LRU, write-through with
    /// write-allocate and tracing off.
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            policies: CachePolicies::default(),
        }
    }
}
