//! Cache set model.
//!
//! A set is a fixed group of `associativity` lines plus the metadata the
//! replacement policies need: a recency order (LRU/MRU) and a count of
//! marked lines (randomized marking). The lines of a set are assigned at
//! construction and never move to another set.

use super::line::CacheLine;
use crate::common::error::CacheError;

/// One associative set.
#[derive(Debug, Clone)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
    /// Way indices from least (front) to most (back) recently used.
    recency: Vec<usize>,
    marked_count: usize,
}

impl CacheSet {
    /// Creates a set of `ways` invalid lines whose data slots start at
    /// `first_block` and are `line_size` bytes apart.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Allocation`] if the metadata arrays cannot be
    /// allocated.
    pub(crate) fn try_new(
        ways: usize,
        first_block: usize,
        line_size: usize,
    ) -> Result<Self, CacheError> {
        let mut lines = Vec::new();
        lines
            .try_reserve_exact(ways)
            .map_err(|_| CacheError::Allocation {
                bytes: ways * size_of::<CacheLine>(),
            })?;
        lines.extend((0..ways).map(|way| CacheLine::empty(first_block + way * line_size)));

        let mut recency = Vec::new();
        recency
            .try_reserve_exact(ways)
            .map_err(|_| CacheError::Allocation {
                bytes: ways * size_of::<usize>(),
            })?;
        recency.extend(0..ways);

        Ok(Self {
            lines,
            recency,
            marked_count: 0,
        })
    }

    /// Number of lines in the set.
    #[inline]
    pub fn associativity(&self) -> usize {
        self.lines.len()
    }

    /// All lines of the set, in way order.
    #[inline]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// The line at `way`.
    #[inline]
    pub fn line(&self, way: usize) -> &CacheLine {
        &self.lines[way]
    }

    #[inline]
    pub(crate) fn line_mut(&mut self, way: usize) -> &mut CacheLine {
        &mut self.lines[way]
    }

    /// Returns the way holding a valid line with `tag`, if any.
    #[inline]
    pub fn find_matching_line(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(tag))
    }

    /// Returns the first invalid way, if the set has spare capacity.
    #[inline]
    pub fn first_invalid(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.valid)
    }

    /// Returns `true` if every line holds a block.
    pub fn is_full(&self) -> bool {
        self.lines.iter().all(|line| line.valid)
    }

    /// Way indices from least to most recently used.
    pub fn recency(&self) -> &[usize] {
        &self.recency
    }

    /// The least recently used way.
    pub fn least_recently_used(&self) -> usize {
        self.recency[0]
    }

    /// The most recently used way.
    pub fn most_recently_used(&self) -> usize {
        self.recency[self.recency.len() - 1]
    }

    /// Moves `way` to the most-recently-used end of the recency order.
    ///
    /// Every other way keeps its relative position.
    pub fn make_most_recently_used(&mut self, way: usize) {
        if let Some(pos) = self.recency.iter().position(|&w| w == way) {
            let _ = self.recency.remove(pos);
        }
        self.recency.push(way);
    }

    /// Number of marked lines.
    pub const fn marked_count(&self) -> usize {
        self.marked_count
    }

    /// Marks `way`; marking an already marked way is a no-op.
    pub fn mark(&mut self, way: usize) {
        let line = &mut self.lines[way];
        if !line.marked {
            line.marked = true;
            self.marked_count += 1;
        }
    }

    /// Clears every mark, starting a new marking phase.
    pub fn clear_marks(&mut self) {
        for line in &mut self.lines {
            line.marked = false;
        }
        self.marked_count = 0;
    }

    /// Iterates over the ways that are not marked, in way order.
    pub fn unmarked_ways(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.marked)
            .map(|(way, _)| way)
    }

    /// Verifies the set's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Invariant`] if two valid lines share a tag,
    /// the recency order is not a permutation of the ways, or the marked
    /// count disagrees with the mark bits.
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        for (way, line) in self.lines.iter().enumerate() {
            if !line.valid {
                continue;
            }
            if self.lines[way + 1..].iter().any(|other| other.matches(line.tag)) {
                return Err(CacheError::Invariant(format!(
                    "tag {:#x} is resident in more than one way",
                    line.tag
                )));
            }
        }

        let mut seen = vec![false; self.lines.len()];
        for &way in &self.recency {
            match seen.get_mut(way) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(CacheError::Invariant(format!(
                        "recency order {:?} is not a permutation",
                        self.recency
                    )));
                }
            }
        }
        if self.recency.len() != self.lines.len() {
            return Err(CacheError::Invariant(format!(
                "recency order has {} entries for {} ways",
                self.recency.len(),
                self.lines.len()
            )));
        }

        let marked = self.lines.iter().filter(|line| line.marked).count();
        if marked != self.marked_count {
            return Err(CacheError::Invariant(format!(
                "marked count {} but {marked} lines are marked",
                self.marked_count
            )));
        }

        Ok(())
    }
}
