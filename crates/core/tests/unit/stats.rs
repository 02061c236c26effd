//! Statistics Tests.
//!
//! Verifies derived rates, formatting and JSON output of [`CacheStats`],
//! and that a cache's counters reflect the accesses made through it.

use cachesim_core::CacheStats;
use pretty_assertions::assert_eq;

use crate::common::lru_cache;

#[test]
fn empty_stats_have_zero_rates() {
    let stats = CacheStats::default();
    assert_eq!(stats.hits(), 0);
    assert!(stats.hit_rate().abs() < f64::EPSILON);
    assert!(stats.miss_rate().abs() < f64::EPSILON);
}

#[test]
fn rates_are_fractions_of_accesses() {
    let stats = CacheStats {
        accesses: 8,
        misses: 2,
        writebacks: 1,
    };
    assert_eq!(stats.hits(), 6);
    assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!((stats.miss_rate() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn display_lists_every_counter() {
    let stats = CacheStats {
        accesses: 4,
        misses: 1,
        writebacks: 0,
    };
    let out = stats.to_string();
    assert!(out.contains("accesses:   4"));
    assert!(out.contains("hits:       3"));
    assert!(out.contains("misses:     1 (25.00%)"));
    assert!(out.contains("writebacks: 0"));
}

#[test]
fn serializes_raw_counters() {
    let stats = CacheStats {
        accesses: 10,
        misses: 3,
        writebacks: 2,
    };
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "accesses": 10, "misses": 3, "writebacks": 2 })
    );
}

#[test]
fn cache_counters_track_accesses() {
    let mut cache = lru_cache();
    for _ in 0..3 {
        let _ = cache.read(0x20);
    }
    cache.write(0x60, 1);
    let stats = cache.stats();
    assert_eq!(stats.accesses, 4);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits(), 2);
    assert_eq!(cache.access_count(), stats.accesses);
    assert_eq!(cache.miss_count(), stats.misses);
}
