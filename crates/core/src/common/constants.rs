//! Machine constants.
//!
//! The simulated processor issues 64-bit addresses and moves 64-bit words
//! between registers and the cache.

/// Width of a simulated address in bits.
pub const ADDRESS_BITS: u32 = u64::BITS;

/// Size of one simulated data word in bytes.
///
/// Every `read`/`write` moves exactly this many bytes, so a cache line must
/// be at least this large.
pub const WORD_BYTES: usize = size_of::<u64>();
