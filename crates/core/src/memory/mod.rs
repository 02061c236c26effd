//! Backing memory behind the cache.
//!
//! The cache fills lines from, and writes dirty or write-through data back
//! to, a byte-addressable store. This module provides:
//! 1. **Interface:** The [`BackingStore`] trait the access engine talks to.
//! 2. **Flat Memory:** [`FlatMemory`], a zero-initialized byte array starting at address 0.

/// Flat byte-array memory.
pub mod flat;

pub use flat::FlatMemory;

/// Byte-addressable memory the cache sits in front of.
///
/// Addresses are absolute; an implementation decides how they map to its
/// own storage. Accesses outside the store are caller bugs and may panic.
pub trait BackingStore {
    /// Copies `buf.len()` bytes starting at `addr` into `buf`.
    fn read_bytes(&self, addr: u64, buf: &mut [u8]);

    /// Copies `data` into memory starting at `addr`.
    fn write_bytes(&mut self, addr: u64, data: &[u8]);

    /// Reads a 64-bit word in native byte order.
    fn read_u64(&self, addr: u64) -> u64 {
        let mut word = [0u8; size_of::<u64>()];
        self.read_bytes(addr, &mut word);
        u64::from_ne_bytes(word)
    }

    /// Writes a 64-bit word in native byte order.
    fn write_u64(&mut self, addr: u64, val: u64) {
        self.write_bytes(addr, &val.to_ne_bytes());
    }
}
