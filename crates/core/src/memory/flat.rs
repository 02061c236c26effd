//! Flat Memory Implementation.
//!
//! A contiguous, zero-initialized byte array mapped at address 0. This is
//! the simplest possible main memory: no latency, no banking, no holes.

use super::BackingStore;

/// A flat byte array standing in for main memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatMemory {
    bytes: Vec<u8>,
}

impl FlatMemory {
    /// Creates a zero-filled memory of `size` bytes.
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the memory in bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Returns the size of the memory in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the memory has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the whole memory as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Converts an address range to a slice range, panicking if it does not fit.
    fn range(&self, addr: u64, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(addr).unwrap_or(usize::MAX);
        let end = start.saturating_add(len);
        assert!(
            end <= self.bytes.len(),
            "memory access {addr:#x}+{len} out of bounds (size {:#x})",
            self.bytes.len()
        );
        start..end
    }
}

impl From<Vec<u8>> for FlatMemory {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl BackingStore for FlatMemory {
    fn read_bytes(&self, addr: u64, buf: &mut [u8]) {
        let range = self.range(addr, buf.len());
        buf.copy_from_slice(&self.bytes[range]);
    }

    fn write_bytes(&mut self, addr: u64, data: &[u8]) {
        let range = self.range(addr, data.len());
        self.bytes[range].copy_from_slice(data);
    }
}
