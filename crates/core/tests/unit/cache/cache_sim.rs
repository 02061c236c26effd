//! Cache Access Engine Unit Tests.
//!
//! Verifies lookup, placement and eviction in the set-associative cache,
//! the data returned on hits and misses, and construction-time checks.
//!
//! Most tests use `common::small_config`: 128 bytes, 16-byte lines and
//! 2 ways, i.e. 8 lines in 4 sets. Blocks 0x40 apart share a set.

use cachesim_core::config::{
    AllocatePolicy, CacheConfig, ReplacementPolicy, WritePolicy,
};
use cachesim_core::{Cache, CacheError, FlatMemory};

use crate::common::{MEMORY_BYTES, address_tagged_memory, build, policies, small_config};

fn scenario_config(replacement: ReplacementPolicy) -> CacheConfig {
    small_config(policies(
        replacement,
        WritePolicy::WriteThrough,
        AllocatePolicy::WriteAllocate,
    ))
}

fn scenario_cache() -> Cache<FlatMemory> {
    build(&scenario_config(ReplacementPolicy::Lru))
}

// ══════════════════════════════════════════════════════════
// 1. Cold Miss
// ══════════════════════════════════════════════════════════

/// First access to any address is a compulsory miss that still returns
/// the word stored in backing memory.
#[test]
fn cold_miss_returns_memory_word() {
    let mut cache = scenario_cache();
    assert_eq!(cache.read(0x100), 0x100);
    assert_eq!(cache.access_count(), 1);
    assert_eq!(cache.miss_count(), 1);
}

// ══════════════════════════════════════════════════════════
// 2. Warm Hit
// ══════════════════════════════════════════════════════════

#[test]
fn warm_hit_counts_access_only() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x100);
    assert_eq!(cache.read(0x100), 0x100);
    assert_eq!(cache.access_count(), 2);
    assert_eq!(cache.miss_count(), 1);
}

/// The whole block is fetched on a miss, so another word of the same line hits.
#[test]
fn same_line_different_offset_hits() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x100);
    assert_eq!(cache.read(0x108), 0x108);
    assert_eq!(cache.miss_count(), 1);
}

#[test]
fn next_line_misses() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x100);
    let _ = cache.read(0x110);
    assert_eq!(cache.miss_count(), 2);
}

// ══════════════════════════════════════════════════════════
// 3. Set Conflict / Eviction
// ══════════════════════════════════════════════════════════

/// 0x00, 0x40 and 0x80 share set 0 with tags 0, 1, 2. Under LRU the first
/// two fill the set and the third evicts the block holding 0x00.
#[test]
fn third_conflicting_block_evicts_lru() {
    let mut cache = scenario_cache();

    let _ = cache.read(0x00);
    let _ = cache.read(0x40);
    assert_eq!(cache.miss_count(), 2);
    assert!(cache.contains(0x00));
    assert!(cache.contains(0x40));

    let _ = cache.read(0x80);
    assert_eq!(cache.miss_count(), 3);
    assert!(!cache.contains(0x00), "LRU victim should be evicted");
    assert!(cache.contains(0x40), "Recently used block should survive");
    assert!(cache.contains(0x80), "New block should be resident");
}

/// A miss with a free way in the set never evicts.
#[test]
fn free_way_is_used_before_evicting() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x00);
    let _ = cache.read(0x40);

    let set = &cache.sets()[0];
    assert!(set.is_full());
    assert_eq!(set.line(0).tag, 0);
    assert_eq!(set.line(1).tag, 1);
}

/// Blocks in different sets never compete for a way.
#[test]
fn different_sets_do_not_conflict() {
    let mut cache = scenario_cache();
    for addr in [0x00, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70] {
        let _ = cache.read(addr);
    }
    for addr in [0x00, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70] {
        assert!(cache.contains(addr), "{addr:#x} should still be resident");
    }
    assert_eq!(cache.miss_count(), 8);
}

/// A refetched block comes back with the backing memory's contents.
#[test]
fn evicted_block_is_refetched() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x00);
    let _ = cache.read(0x40);
    let _ = cache.read(0x80);
    assert_eq!(cache.read(0x08), 0x08);
    assert_eq!(cache.miss_count(), 4);
}

// ══════════════════════════════════════════════════════════
// 4. Direct-Mapped and Fully Associative
// ══════════════════════════════════════════════════════════

#[test]
fn direct_mapped_conflicts_immediately() {
    let config = CacheConfig::new(
        64,
        16,
        1,
        policies(
            ReplacementPolicy::Lru,
            WritePolicy::WriteThrough,
            AllocatePolicy::WriteAllocate,
        ),
    );
    let mut cache = build(&config);
    let _ = cache.read(0x00);
    let _ = cache.read(0x40);
    assert!(!cache.contains(0x00));
    assert_eq!(cache.read(0x00), 0);
    assert_eq!(cache.miss_count(), 3);
}

#[test]
fn fully_associative_holds_any_four_blocks() {
    let config = CacheConfig::new(
        64,
        16,
        4,
        policies(
            ReplacementPolicy::Lru,
            WritePolicy::WriteThrough,
            AllocatePolicy::WriteAllocate,
        ),
    );
    let mut cache = build(&config);
    assert_eq!(cache.geometry().num_sets, 1);
    for addr in [0x000, 0x130, 0x770, 0xFF0] {
        let _ = cache.read(addr);
    }
    for addr in [0x000, 0x130, 0x770, 0xFF0] {
        assert!(cache.contains(addr));
    }
}

// ══════════════════════════════════════════════════════════
// 5. Contains
// ══════════════════════════════════════════════════════════

/// `contains` is a pure probe: no counters move and LRU order is untouched.
#[test]
fn contains_does_not_count_or_reorder() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x00);
    let _ = cache.read(0x40);

    assert!(cache.contains(0x00));
    assert_eq!(cache.access_count(), 2);

    // 0x00 is still LRU despite the probe.
    let _ = cache.read(0x80);
    assert!(!cache.contains(0x00));
}

// ══════════════════════════════════════════════════════════
// 6. Geometry and Construction
// ══════════════════════════════════════════════════════════

#[test]
fn geometry_and_masks_follow_config() {
    let cache = build(&CacheConfig::new(
        256,
        16,
        2,
        policies(
            ReplacementPolicy::Lru,
            WritePolicy::WriteThrough,
            AllocatePolicy::WriteAllocate,
        ),
    ));
    let g = cache.geometry();
    assert_eq!(g.num_lines, 16);
    assert_eq!(g.num_sets, 8);
    assert_eq!(g.associativity, 2);
    assert_eq!(g.capacity(), 256);
    assert_eq!(cache.sets().len(), 8);

    let dec = cache.decoder();
    assert_eq!(dec.block_offset_mask(), 0xF);
    assert_eq!(dec.set_index_mask(), 0x70);
    assert_eq!(dec.tag_shift(), 7);
}

/// Line data slots are laid out back to back in one array.
#[test]
fn line_slots_are_contiguous_and_disjoint() {
    let cache = scenario_cache();
    let mut offsets: Vec<usize> = cache
        .sets()
        .iter()
        .flat_map(|s| s.lines().iter().map(|l| l.block_offset()))
        .collect();
    offsets.sort_unstable();
    let expected: Vec<usize> = (0..8).map(|i| i * 16).collect();
    assert_eq!(offsets, expected);
}

#[test]
fn invalid_config_produces_no_cache() {
    let config = CacheConfig::new(
        96,
        16,
        2,
        policies(
            ReplacementPolicy::Lru,
            WritePolicy::WriteThrough,
            AllocatePolicy::WriteAllocate,
        ),
    );
    let err = Cache::new(&config, FlatMemory::new(MEMORY_BYTES), || 0u64).unwrap_err();
    assert!(matches!(
        err,
        CacheError::InvalidConfig {
            field: "size_bytes",
            ..
        }
    ));
}

// ══════════════════════════════════════════════════════════
// 7. Preconditions
// ══════════════════════════════════════════════════════════

#[test]
#[should_panic(expected = "crosses a 16-byte line boundary")]
fn word_crossing_line_end_panics() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x0C);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn block_outside_memory_panics() {
    let mut cache = Cache::new(
        &scenario_config(ReplacementPolicy::Lru),
        FlatMemory::new(64),
        || 0u64,
    )
    .unwrap();
    let _ = cache.read(0x100);
}

// ══════════════════════════════════════════════════════════
// 8. Teardown
// ══════════════════════════════════════════════════════════

#[test]
fn into_parts_returns_memory_and_counters() {
    let mut cache = scenario_cache();
    let _ = cache.read(0x00);
    let _ = cache.read(0x00);
    let (memory, stats) = cache.into_parts();
    assert_eq!(memory, address_tagged_memory());
    assert_eq!(stats.accesses, 2);
    assert_eq!(stats.misses, 1);
}

#[test]
fn debug_output_names_the_policy() {
    let cache = scenario_cache();
    let out = format!("{cache:?}");
    assert!(out.contains("LruPolicy"));
    assert!(out.contains("geometry"));
}

// ══════════════════════════════════════════════════════════
// 9. Tracing
// ══════════════════════════════════════════════════════════

/// Turning on access tracing emits events without changing behaviour.
#[test]
fn traced_cache_matches_untraced() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let traced = scenario_config(ReplacementPolicy::Lru);
    let traced = CacheConfig::new(
        traced.size_bytes,
        traced.line_bytes,
        traced.ways,
        traced.policies.with_trace(true),
    );
    let mut with_trace = build(&traced);
    let mut without = scenario_cache();

    for addr in [0x00, 0x40, 0x80, 0x00, 0x48] {
        assert_eq!(with_trace.read(addr), without.read(addr));
    }
    with_trace.write(0x10, 5);
    without.write(0x10, 5);
    assert_eq!(with_trace.stats(), without.stats());
    assert!(with_trace.policies().trace);
}
