//! Address Decoder.
//!
//! Splits a raw 64-bit address into the three fields a set-associative cache
//! indexes by:
//!
//! ```text
//!  63                  tag_shift   set_index_shift        0
//! +-----------------------+--------------+---------------+
//! |          tag          |  set index   | block offset  |
//! +-----------------------+--------------+---------------+
//! ```
//!
//! All masks and shifts are computed once from the cache geometry, so decoding
//! is a handful of AND/shift operations with no division.

use super::constants::ADDRESS_BITS;

/// The fields of an address as seen by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    /// High-order bits identifying which block occupies a line.
    pub tag: u64,
    /// Index of the set the block maps to.
    pub set_index: usize,
    /// Byte offset of the access within the line.
    pub block_offset: usize,
}

/// Precomputed masks and shifts for a given line size and set count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressDecoder {
    block_offset_mask: u64,
    set_index_mask: u64,
    set_index_shift: u32,
    tag_mask: u64,
    tag_shift: u32,
}

/// Returns a mask with the low `bits` bits set.
const fn mask_bits(bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl AddressDecoder {
    /// Creates a decoder for a cache with the given geometry.
    ///
    /// Both arguments must be non-zero powers of two; `CacheConfig::validate`
    /// guarantees this before a decoder is ever built.
    ///
    /// # Arguments
    ///
    /// * `line_size` - Bytes per cache line.
    /// * `num_sets` - Number of sets in the cache.
    pub const fn new(line_size: usize, num_sets: usize) -> Self {
        let offset_bits = line_size.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        let tag_shift = offset_bits + index_bits;

        let tag_mask = if tag_shift >= ADDRESS_BITS {
            0
        } else {
            u64::MAX << tag_shift
        };

        Self {
            block_offset_mask: mask_bits(offset_bits),
            set_index_mask: mask_bits(index_bits) << offset_bits,
            set_index_shift: offset_bits,
            tag_mask,
            tag_shift,
        }
    }

    /// Splits `addr` into tag, set index and block offset.
    #[inline]
    pub const fn decode(&self, addr: u64) -> DecodedAddress {
        DecodedAddress {
            tag: self.tag_of(addr),
            set_index: ((addr & self.set_index_mask) >> self.set_index_shift) as usize,
            block_offset: (addr & self.block_offset_mask) as usize,
        }
    }

    /// Returns the tag bits of `addr`, shifted down to bit 0.
    #[inline]
    pub const fn tag_of(&self, addr: u64) -> u64 {
        if self.tag_shift >= ADDRESS_BITS {
            0
        } else {
            (addr & self.tag_mask) >> self.tag_shift
        }
    }

    /// Returns the address of the first byte of the block containing `addr`.
    #[inline]
    pub const fn block_base(&self, addr: u64) -> u64 {
        addr & !self.block_offset_mask
    }

    /// Rebuilds the block-aligned address of a line from its tag and set.
    ///
    /// This is the inverse of [`decode`](Self::decode) with the offset
    /// dropped, used to locate a dirty victim in the backing store.
    #[inline]
    pub const fn compose(&self, tag: u64, set_index: usize) -> u64 {
        let tag_bits = if self.tag_shift >= ADDRESS_BITS {
            0
        } else {
            (tag << self.tag_shift) & self.tag_mask
        };
        tag_bits | (((set_index as u64) << self.set_index_shift) & self.set_index_mask)
    }

    /// Mask selecting the block offset bits.
    pub const fn block_offset_mask(&self) -> u64 {
        self.block_offset_mask
    }

    /// Mask selecting the set index bits (still in place, not shifted).
    pub const fn set_index_mask(&self) -> u64 {
        self.set_index_mask
    }

    /// Shift that moves the set index down to bit 0.
    pub const fn set_index_shift(&self) -> u32 {
        self.set_index_shift
    }

    /// Mask selecting the tag bits (still in place, not shifted).
    pub const fn tag_mask(&self) -> u64 {
        self.tag_mask
    }

    /// Shift that moves the tag down to bit 0.
    pub const fn tag_shift(&self) -> u32 {
        self.tag_shift
    }
}
