//! Error definitions.
//!
//! Every fallible operation in the engine happens at construction time:
//! 1. **Configuration:** Geometry or policy values the address decoder cannot work with.
//! 2. **Allocation:** The host could not provide memory for the cache arrays.
//! 3. **Invariants:** Debug-time consistency checks over the set model.
//!
//! Reads and writes themselves never fail; addressing mistakes are caller
//! bugs and panic.

use thiserror::Error;

/// Errors produced while building or checking a cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A configuration value was rejected before any storage was allocated.
    #[error("invalid cache configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending parameter.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The host allocator refused to provide the cache arrays.
    #[error("failed to allocate {bytes} bytes for cache storage")]
    Allocation {
        /// Size of the request that failed.
        bytes: usize,
    },

    /// An internal consistency check failed.
    #[error("cache invariant violated: {0}")]
    Invariant(String),
}

impl CacheError {
    /// Shorthand for building an [`CacheError::InvalidConfig`].
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
