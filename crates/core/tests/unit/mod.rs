//! # Unit Tests
//!
//! Tests grouped by the layer of the engine they exercise.



/// Counter arithmetic and reporting.
pub mod stats;
