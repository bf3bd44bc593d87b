//! Errors reported by the bounds-checked [`crate::region::TaggedMemory`] API.
//!
//! The raw copy routines never fail; their preconditions are documented
//! `# Safety` contracts instead.

use thiserror::Error;

/// Rejected request against a [`crate::region::TaggedMemory`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// Byte range does not fit in the buffer
    #[error("Out of bounds: offset {offset}, len {len}, size {size}")]
    OutOfBounds {
        /// Start of the requested range
        offset: usize,
        /// Length of the requested range
        len: usize,
        /// Size of the buffer in bytes
        size: usize,
    },

    /// Non-overlapping copy requested on overlapping ranges
    #[error("Overlapping copy: dst {dst}, src {src}, len {len}")]
    Overlap {
        /// Destination byte offset
        dst: usize,
        /// Source byte offset
        src: usize,
        /// Transfer length in bytes
        len: usize,
    },

    /// Word view requested at a byte offset that is not on a word boundary
    #[error("Misaligned word access at byte offset {offset}")]
    Misaligned {
        /// The offending byte offset
        offset: usize,
    },

    /// Raw tag value wider than the platform tag
    #[error("Tag value {value} exceeds the tag width")]
    TagOutOfRange {
        /// The rejected value
        value: u8,
    },
}

/// Result alias for region operations.
pub type Result<T> = core::result::Result<T, RegionError>;
