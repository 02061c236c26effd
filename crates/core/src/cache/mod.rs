//! Set-Associative Cache Simulator.
//!
//! This module implements the access engine: a configurable set-associative
//! cache holding real data in front of a [`BackingStore`]. It supports four
//! replacement policies (Random, LRU, MRU, randomized marking), write-through
//! and write-back hits, and write-allocate and write-no-allocate misses.
//!
//! Every access follows the same path:
//!
//! ```text
//! decode address -> probe set for tag -> hit:  service from the line
//!                                     -> miss: free slot or victim,
//!                                              write back dirty victim,
//!                                              fetch block, service
//! ```

/// Cache line metadata.
pub mod line;

/// Cache replacement policy implementations (Random, LRU, MRU, marking).
pub mod policies;

/// Associative set model.
pub mod set;

use std::fmt;

use self::policies::ReplacementPolicy;
use self::set::CacheSet;
use crate::common::addr::{AddressDecoder, DecodedAddress};
use crate::common::constants::WORD_BYTES;
use crate::common::error::CacheError;
use crate::config::{AllocatePolicy, CacheConfig, CacheGeometry, CachePolicies, WritePolicy};
use crate::memory::BackingStore;
use crate::rng::RandomSource;
use crate::stats::CacheStats;

/// Kind of access, used for trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// A set-associative cache in front of backing memory `M`.
///
/// The cache owns one contiguous byte array of `num_lines * line_size` bytes
/// for line data; each line's slot in it is fixed at construction. Lines are
/// partitioned into `num_sets` sets of `associativity` lines each.
pub struct Cache<M: BackingStore> {
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    policies: CachePolicies,
    data: Vec<u8>,
    sets: Vec<CacheSet>,
    policy: Box<dyn ReplacementPolicy>,
    rng: Box<dyn RandomSource + Send>,
    memory: M,
    stats: CacheStats,
}

impl<M: BackingStore> Cache<M> {
    /// Creates a cache described by `config` in front of `memory`.
    ///
    /// All line storage and set metadata is allocated here; nothing is
    /// allocated by later accesses.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache geometry and policies.
    /// * `memory` - Backing memory the cache fills from and writes to.
    /// * `rng` - Random source for the Random and randomized-marking policies.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] if `config` fails validation and
    /// [`CacheError::Allocation`] if the host cannot provide the storage.
    pub fn new<R>(config: &CacheConfig, memory: M, rng: R) -> Result<Self, CacheError>
    where
        R: RandomSource + Send + 'static,
    {
        let geometry = config.validate()?;
        let decoder = AddressDecoder::new(geometry.line_size, geometry.num_sets);

        let bytes = geometry.capacity();
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| CacheError::Allocation { bytes })?;
        data.resize(bytes, 0);

        let mut sets = Vec::new();
        sets.try_reserve_exact(geometry.num_sets)
            .map_err(|_| CacheError::Allocation {
                bytes: geometry.num_sets * size_of::<CacheSet>(),
            })?;
        let set_bytes = geometry.associativity * geometry.line_size;
        for index in 0..geometry.num_sets {
            sets.push(CacheSet::try_new(
                geometry.associativity,
                index * set_bytes,
                geometry.line_size,
            )?);
        }

        tracing::debug!(
            sets = geometry.num_sets,
            ways = geometry.associativity,
            line_size = geometry.line_size,
            replacement = ?config.policies.replacement,
            write = ?config.policies.write,
            allocate = ?config.policies.allocate,
            "cache created"
        );

        Ok(Self {
            geometry,
            decoder,
            policies: config.policies,
            data,
            sets,
            policy: policies::for_kind(config.policies.replacement),
            rng: Box::new(rng),
            memory,
            stats: CacheStats::default(),
        })
    }

    /// Reads the 64-bit word at `addr` through the cache.
    ///
    /// On a miss the whole block containing `addr` is fetched from backing
    /// memory first, evicting a line if the set is full.
    ///
    /// # Panics
    ///
    /// Panics if the word at `addr` would cross the end of its cache line,
    /// or if the block lies outside the backing store.
    pub fn read(&mut self, addr: u64) -> u64 {
        self.stats.record_access();
        let decoded = self.decoder.decode(addr);
        self.check_word(addr, decoded);

        let (way, hit) = self.lookup(addr, decoded);
        self.trace_access(AccessKind::Read, addr, decoded, hit);

        let block = self.sets[decoded.set_index].line(way).block_offset();
        self.load_word(block + decoded.block_offset)
    }

    /// Writes the 64-bit word `value` at `addr` according to the write policies.
    ///
    /// - Hit, write-through: line and backing memory are both updated.
    /// - Hit, write-back: only the line is updated and becomes dirty.
    /// - Miss, write-allocate: the block is installed, then written as a hit.
    /// - Miss, write-no-allocate: backing memory is updated, no line changes.
    ///
    /// # Panics
    ///
    /// Panics if the word at `addr` would cross the end of its cache line,
    /// or if the address lies outside the backing store.
    pub fn write(&mut self, addr: u64, value: u64) {
        self.stats.record_access();
        let decoded = self.decoder.decode(addr);
        self.check_word(addr, decoded);

        if let Some(way) = self.probe(decoded) {
            self.trace_access(AccessKind::Write, addr, decoded, true);
            self.write_hit(addr, decoded, way, value);
            return;
        }

        self.stats.record_miss();
        self.trace_access(AccessKind::Write, addr, decoded, false);
        match self.policies.allocate {
            AllocatePolicy::WriteAllocate => {
                let way = self.install(addr, decoded);
                self.write_hit(addr, decoded, way, value);
            }
            AllocatePolicy::NoWriteAllocate => self.memory.write_u64(addr, value),
        }
    }

    /// Returns `true` if the block containing `addr` is resident.
    ///
    /// Does not count as an access and does not touch policy state.
    pub fn contains(&self, addr: u64) -> bool {
        let decoded = self.decoder.decode(addr);
        self.sets[decoded.set_index]
            .find_matching_line(decoded.tag)
            .is_some()
    }

    /// Writes every dirty line back to backing memory.
    ///
    /// Lines stay valid and become clean, so later accesses still hit.
    /// Under write-through no line is ever dirty and this does nothing.
    pub fn flush(&mut self) {
        for set_index in 0..self.sets.len() {
            for way in 0..self.geometry.associativity {
                self.write_back_if_dirty(set_index, way);
            }
        }
    }

    /// Number of `read`/`write` calls so far.
    pub const fn access_count(&self) -> u64 {
        self.stats.accesses
    }

    /// Number of accesses that missed so far.
    pub const fn miss_count(&self) -> u64 {
        self.stats.misses
    }

    /// Snapshot of all counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The validated geometry.
    pub const fn geometry(&self) -> CacheGeometry {
        self.geometry
    }

    /// The configured policies.
    pub const fn policies(&self) -> CachePolicies {
        self.policies
    }

    /// The address decoder built for this geometry.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// All sets, in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// The backing memory.
    ///
    /// Under write-back it may hold stale data for dirty lines until they
    /// are evicted or [`flush`](Self::flush)ed.
    pub const fn memory(&self) -> &M {
        &self.memory
    }

    /// Verifies every set's invariants and the counter ordering.
    ///
    /// # Errors
    ///
    /// Returns the first [`CacheError::Invariant`] found.
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        if self.stats.misses > self.stats.accesses {
            return Err(CacheError::Invariant(format!(
                "{} misses exceed {} accesses",
                self.stats.misses, self.stats.accesses
            )));
        }
        for (index, set) in self.sets.iter().enumerate() {
            set.check_invariants()
                .map_err(|e| CacheError::Invariant(format!("set {index}: {e}")))?;
        }
        Ok(())
    }

    /// Tears the cache down, returning the backing memory and final counters.
    ///
    /// Dirty lines are *not* written back; call [`flush`](Self::flush) first
    /// if the memory should reflect every write.
    pub fn into_parts(self) -> (M, CacheStats) {
        (self.memory, self.stats)
    }

    /// Returns the way holding `decoded.tag`, applying the hit-side policy update.
    fn probe(&mut self, decoded: DecodedAddress) -> Option<usize> {
        let set = &mut self.sets[decoded.set_index];
        let way = set.find_matching_line(decoded.tag)?;
        self.policy.update(set, way);
        Some(way)
    }

    /// Finds or installs the line for `addr`, counting a miss if needed.
    fn lookup(&mut self, addr: u64, decoded: DecodedAddress) -> (usize, bool) {
        if let Some(way) = self.probe(decoded) {
            return (way, true);
        }
        self.stats.record_miss();
        (self.install(addr, decoded), false)
    }

    /// Installs the block containing `addr` and returns its way.
    ///
    /// Prefers the first invalid line; only a full set asks the policy for
    /// a victim. A dirty victim is written back before being overwritten.
    fn install(&mut self, addr: u64, decoded: DecodedAddress) -> usize {
        let set_index = decoded.set_index;
        let way = {
            let set = &mut self.sets[set_index];
            match set.first_invalid() {
                Some(way) => way,
                None => self.policy.get_victim(set, self.rng.as_mut()),
            }
        };

        self.evict(set_index, way);

        let base = self.decoder.block_base(addr);
        let block = self.sets[set_index].line(way).block_offset();
        let slot = block..block + self.geometry.line_size;
        self.memory.read_bytes(base, &mut self.data[slot]);

        let set = &mut self.sets[set_index];
        let line = set.line_mut(way);
        line.valid = true;
        line.dirty = false;
        line.tag = decoded.tag;
        self.policy.install(set, way);

        way
    }

    /// Makes room in `way`, writing its block back first if it is dirty.
    fn evict(&mut self, set_index: usize, way: usize) {
        let line = self.sets[set_index].line(way);
        if !line.valid {
            return;
        }
        if self.policies.trace {
            tracing::trace!(
                set = set_index,
                way,
                tag = line.tag,
                dirty = line.dirty,
                "evict"
            );
        }
        self.write_back_if_dirty(set_index, way);
        self.sets[set_index].line_mut(way).valid = false;
    }

    /// Copies a dirty line to its home address in backing memory and cleans it.
    fn write_back_if_dirty(&mut self, set_index: usize, way: usize) {
        let line = self.sets[set_index].line(way);
        if !(line.valid && line.dirty) {
            return;
        }
        let home = self.decoder.compose(line.tag, set_index);
        let block = line.block_offset();
        self.memory
            .write_bytes(home, &self.data[block..block + self.geometry.line_size]);
        self.sets[set_index].line_mut(way).dirty = false;
        self.stats.record_writeback();
    }

    /// Applies a write to a resident line per the write-hit policy.
    fn write_hit(&mut self, addr: u64, decoded: DecodedAddress, way: usize, value: u64) {
        let block = self.sets[decoded.set_index].line(way).block_offset();
        self.store_word(block + decoded.block_offset, value);
        match self.policies.write {
            WritePolicy::WriteThrough => self.memory.write_u64(addr, value),
            WritePolicy::WriteBack => self.sets[decoded.set_index].line_mut(way).dirty = true,
        }
    }

    fn load_word(&self, start: usize) -> u64 {
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(&self.data[start..start + WORD_BYTES]);
        u64::from_ne_bytes(word)
    }

    fn store_word(&mut self, start: usize, value: u64) {
        self.data[start..start + WORD_BYTES].copy_from_slice(&value.to_ne_bytes());
    }

    /// Panics if the word at `addr` does not fit inside its line.
    fn check_word(&self, addr: u64, decoded: DecodedAddress) {
        assert!(
            decoded.block_offset + WORD_BYTES <= self.geometry.line_size,
            "word access at {addr:#x} crosses a {}-byte line boundary",
            self.geometry.line_size
        );
    }

    fn trace_access(&self, kind: AccessKind, addr: u64, decoded: DecodedAddress, hit: bool) {
        if self.policies.trace {
            tracing::debug!(
                op = kind.as_str(),
                addr = format_args!("{addr:#x}"),
                set = decoded.set_index,
                tag = format_args!("{:#x}", decoded.tag),
                hit,
                "cache access"
            );
        }
    }
}

impl<M: BackingStore + fmt::Debug> fmt::Debug for Cache<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("geometry", &self.geometry)
            .field("policies", &self.policies)
            .field("policy", &self.policy)
            .field("stats", &self.stats)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}
