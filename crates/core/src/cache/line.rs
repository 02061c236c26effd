//! Cache line metadata.

/// Status bits, tag and storage slot of one cache line.
///
/// The data bytes live in the cache's single contiguous storage array;
/// `block` is the fixed offset of this line's slot within it, assigned at
/// construction and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLine {
    /// Line holds a real block. When clear, `tag` and the block bytes are
    /// meaningless.
    pub valid: bool,
    /// Block differs from backing memory and must be written back on eviction.
    pub dirty: bool,
    /// Already chosen in the current randomized-marking phase.
    pub marked: bool,
    /// Tag of the resident block.
    pub tag: u64,
    block: usize,
}

impl CacheLine {
    /// Creates an invalid line whose data slot starts at `block`.
    pub(crate) const fn empty(block: usize) -> Self {
        Self {
            valid: false,
            dirty: false,
            marked: false,
            tag: 0,
            block,
        }
    }

    /// Returns `true` if the line is valid and holds `tag`.
    #[inline]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    /// Offset of this line's data slot within the cache storage.
    #[inline]
    pub const fn block_offset(&self) -> usize {
        self.block
    }
}
