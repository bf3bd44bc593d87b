//! Alignment classification for copy operands.

use crate::types::{WORD_MASK, WORD_SIZE};

/// Whether a transfer can be carried out word by word with tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentClass {
    /// `dst`, `src` and the length are all multiples of the word size.
    WordAligned,
    /// At least one of them is not.
    Unaligned,
}

/// Classify a `(dst, src, len)` triple strictly: the length must be a whole
/// number of words too.
#[inline(always)]
pub fn classify(dst: *const u8, src: *const u8, len: usize) -> AlignmentClass {
    if ((dst as usize) | (src as usize) | len) & WORD_MASK == 0 {
        AlignmentClass::WordAligned
    } else {
        AlignmentClass::Unaligned
    }
}

#[inline(always)]
pub fn is_word_aligned(addr: *const u8) -> bool {
    (addr as usize) & WORD_MASK == 0
}

/// Class of the whole-word prefix of a transfer between `dst` and `src`.
///
/// The prefix length is a multiple of the word size by construction, so only
/// the two pointers decide. Any trailing bytes past the prefix never carry
/// tags: a 20-byte copy between aligned buffers on a 64-bit target moves two
/// tags and four plain bytes.
#[inline(always)]
pub fn prefix_class(dst: *const u8, src: *const u8) -> AlignmentClass {
    if is_word_aligned(dst) && is_word_aligned(src) {
        AlignmentClass::WordAligned
    } else {
        AlignmentClass::Unaligned
    }
}

/// Whether `a` and `b` sit at the same offset within a word, so that aligning
/// one of them by copying leading bytes aligns the other as well.
#[inline(always)]
pub fn co_aligned(a: *const u8, b: *const u8) -> bool {
    ((a as usize) ^ (b as usize)) & WORD_MASK == 0
}

/// A transfer cut into leading bytes, whole words and trailing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Bytes copied before the first word boundary.
    pub head: usize,
    /// Whole words between the head and the tail.
    pub words: usize,
    /// Bytes left after the last whole word.
    pub tail: usize,
}

impl Split {
    /// Bytes covered by the word section.
    #[inline(always)]
    pub fn word_bytes(&self) -> usize {
        self.words * WORD_SIZE
    }
}

/// Cut a transfer of `len` bytes starting at `addr` at word boundaries.
///
/// When `len` cannot reach the first boundary the whole transfer is head.
#[inline(always)]
pub fn split_at_words(addr: *const u8, len: usize) -> Split {
    let misalign = (addr as usize) & WORD_MASK;
    let head = if misalign == 0 { 0 } else { WORD_SIZE - misalign };
    if head >= len {
        return Split {
            head: len,
            words: 0,
            tail: 0,
        };
    }
    let rest = len - head;
    Split {
        head,
        words: rest / WORD_SIZE,
        tail: rest & WORD_MASK,
    }
}
