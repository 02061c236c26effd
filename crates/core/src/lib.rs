//! Set-associative cache simulator library.
//!
//! This crate models a hardware cache sitting between a processor and a
//! byte-addressable memory:
//! 1. **Addressing:** Tag / set index / block offset decomposition by mask and shift.
//! 2. **Storage:** Lines partitioned into associative sets over one contiguous data array.
//! 3. **Replacement:** Random, LRU, MRU and randomized-marking victim selection.
//! 4. **Writes:** Write-through or write-back hits, write-allocate or no-allocate misses.
//! 5. **Statistics:** Access, miss and write-back counters.
//!
//! ```
//! use cachesim_core::config::{
//!     AllocatePolicy, CacheConfig, CachePolicies, ReplacementPolicy, WritePolicy,
//! };
//! use cachesim_core::{BackingStore, Cache, FlatMemory};
//!
//! let policies = CachePolicies::new(
//!     ReplacementPolicy::Lru,
//!     WritePolicy::WriteBack,
//!     AllocatePolicy::WriteAllocate,
//! );
//! let config = CacheConfig::new(256, 16, 2, policies);
//! let mut cache = Cache::new(&config, FlatMemory::new(4096), || 0u64).unwrap();
//!
//! cache.write(0x40, 42);
//! assert_eq!(cache.read(0x40), 42);
//! assert_eq!(cache.access_count(), 2);
//! assert_eq!(cache.miss_count(), 1);
//!
//! cache.flush();
//! assert_eq!(cache.memory().read_u64(0x40), 42);
//! ```

/// Access engine, set model and replacement policies.
pub mod cache;
/// Address decoding, constants and error types.
pub mod common;
/// Cache geometry and policy configuration.
pub mod config;
/// Backing memory interface and flat implementation.
pub mod memory;
/// Caller-supplied randomness.
pub mod rng;
/// Access and miss counters.
pub mod stats;

/// Main cache type; construct with `Cache::new`.
pub use crate::cache::Cache;
/// Error returned by fallible constructors.
pub use crate::common::CacheError;
/// Cache configuration; use `CacheConfig::new` or `CacheConfig::default()`.
pub use crate::config::CacheConfig;
/// Memory interface the cache fills from and writes back to.
pub use crate::memory::BackingStore;
/// Flat byte-array backing memory.
pub use crate::memory::FlatMemory;
/// Randomness capability injected into the cache.
pub use crate::rng::RandomSource;
/// Counter snapshot.
pub use crate::stats::CacheStats;
