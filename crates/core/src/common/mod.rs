//! Common types shared by every layer of the cache simulator.
//!
//! This module provides the building blocks the engine is assembled from:
//! 1. **Address Decoding:** Splitting a raw address into tag, set index and block offset.
//! 2. **Constants:** Word size and address width of the simulated machine.
//! 3. **Error Handling:** The error type returned by fallible constructors.

/// Address decomposition into tag, set index and block offset.
pub mod addr;

/// Constants describing the simulated machine.
pub mod constants;

/// Error types for configuration and invariant failures.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddress};
pub use constants::{ADDRESS_BITS, WORD_BYTES};
pub use error::CacheError;
