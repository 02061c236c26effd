//! Injected randomness.
//!
//! The random and randomized-marking replacement policies need random
//! numbers, but the engine never owns a generator. The caller supplies a
//! [`RandomSource`], which makes every random choice reproducible when the
//! source is deterministic.
//!
//! Any `FnMut() -> u64` closure is a `RandomSource`:
//!
//! ```
//! use cachesim_core::rng::RandomSource;
//!
//! let mut n = 0u64;
//! let mut counter = move || {
//!     n += 1;
//!     n
//! };
//! assert_eq!(counter.next_random(), 1);
//! assert_eq!(counter.next_random(), 2);
//! ```

/// A source of non-negative integers for random victim selection.
pub trait RandomSource {
    /// Returns the next number. The engine reduces it modulo the number of
    /// candidates, so the full `u64` range is fine.
    fn next_random(&mut self) -> u64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> u64,
{
    #[inline]
    fn next_random(&mut self) -> u64 {
        self()
    }
}

/// Picks an index in `0..n` using `rng`.
///
/// A single candidate is returned directly so the source is only consulted
/// when there is a real choice to make.
pub(crate) fn choose_index(rng: &mut dyn RandomSource, n: usize) -> usize {
    debug_assert!(n > 0, "choose_index called with no candidates");
    if n <= 1 {
        0
    } else {
        (rng.next_random() % n as u64) as usize
    }
}
