//! Shared helpers for cache tests.

#![allow(dead_code)]

/// Mock implementations of engine collaborators.
pub mod mocks;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cachesim_core::config::{
    AllocatePolicy, CacheConfig, CachePolicies, ReplacementPolicy, WritePolicy,
};
use cachesim_core::{Cache, FlatMemory};

/// Size of the backing memory used by most tests.
pub const MEMORY_BYTES: usize = 4096;

/// Distance between consecutive blocks that map to the same set in the
/// default test geometry (16-byte lines x 4 sets).
pub const SET_STRIDE: u64 = 0x40;

/// Builds a policy set.
pub fn policies(
    replacement: ReplacementPolicy,
    write: WritePolicy,
    allocate: AllocatePolicy,
) -> CachePolicies {
    CachePolicies::new(replacement, write, allocate)
}

/// 128 bytes, 16-byte lines, 2 ways: 8 lines in 4 sets.
///
/// offset = addr & 0xF, set = (addr >> 4) & 0x3, tag = addr >> 6
pub fn small_config(policies: CachePolicies) -> CacheConfig {
    CacheConfig::new(128, 16, 2, policies)
}

/// 64 bytes, 16-byte lines, 4 ways: one fully associative set.
pub fn single_set_config(policies: CachePolicies) -> CacheConfig {
    CacheConfig::new(64, 16, 4, policies)
}

/// Memory where the word at every 8-byte aligned address `a` holds `a`.
pub fn address_tagged_memory() -> FlatMemory {
    let mut bytes = Vec::with_capacity(MEMORY_BYTES);
    for addr in (0..MEMORY_BYTES as u64).step_by(8) {
        bytes.extend_from_slice(&addr.to_ne_bytes());
    }
    FlatMemory::from(bytes)
}

/// Builds a cache over [`address_tagged_memory`] with a random source that always returns 0.
pub fn build(config: &CacheConfig) -> Cache<FlatMemory> {
    Cache::new(config, address_tagged_memory(), || 0u64).unwrap()
}

/// Builds the default LRU / write-through / write-allocate test cache.
pub fn lru_cache() -> Cache<FlatMemory> {
    build(&small_config(policies(
        ReplacementPolicy::Lru,
        WritePolicy::WriteThrough,
        AllocatePolicy::WriteAllocate,
    )))
}

/// A random source that replays `values` in a loop.
pub fn scripted(values: Vec<u64>) -> impl FnMut() -> u64 + Send + 'static {
    let mut i = 0;
    move || {
        let v = values[i % values.len()];
        i += 1;
        v
    }
}

/// A random source that always returns 0 and counts how often it is called.
pub fn counting() -> (impl FnMut() -> u64 + Send + 'static, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let rng = move || {
        let _ = seen.fetch_add(1, Ordering::Relaxed);
        0u64
    };
    (rng, calls)
}

/// Returns the way of `set` whose tag differs between two snapshots.
pub fn replaced_way(before: &[u64], after: &[u64]) -> Option<usize> {
    before.iter().zip(after).position(|(a, b)| a != b)
}

/// Tags of all lines in `set`, in way order.
pub fn tags(cache: &Cache<FlatMemory>, set: usize) -> Vec<u64> {
    cache.sets()[set].lines().iter().map(|l| l.tag).collect()
}
