//! Owned tagged memory with checked byte and word views.
//!
//! [`TaggedMemory`] keeps data as whole words with one tag per word, and
//! exposes the same storage as bytes. Offsets are validated before any raw copy
//! routine runs, so callers get a [`RegionError`] instead of undefined
//! behavior. Word views are only handed out at word boundaries.
#![allow(unsafe_code)]

use tracing::{debug, trace};

use crate::align::{AlignmentClass, prefix_class};
use crate::error::{RegionError, Result};
use crate::memcpy::{memcpy_no_tags, tagged_memcpy};
use crate::memmove::{memmove_no_tags, tagged_memmove};
use crate::overlap::ranges_overlap;
use crate::tag::{CrossTags, SliceTags};
use crate::types::{Tag, WORD_MASK, WORD_SIZE, Word};

/// A byte buffer whose every word carries a tag.
#[derive(Clone, PartialEq, Eq)]
pub struct TaggedMemory {
    cells: Vec<Word>,
    tags: Vec<Tag>,
    len: usize,
}

impl TaggedMemory {
    /// Zeroed buffer of `len` bytes with every tag [`Tag::NONE`].
    pub fn new(len: usize) -> Self {
        let words = len.div_ceil(WORD_SIZE);
        Self {
            cells: vec![0; words],
            tags: vec![Tag::NONE; words],
            len,
        }
    }

    /// Untagged buffer holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut mem = Self::new(bytes.len());
        mem.as_bytes_mut().copy_from_slice(bytes);
        mem
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of cells, including a trailing partial word.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `cells` owns at least `len` initialized bytes and u8 has no
        // alignment or validity requirements.
        unsafe { core::slice::from_raw_parts(self.cells.as_ptr().cast::<u8>(), self.len) }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { core::slice::from_raw_parts_mut(self.cells.as_mut_ptr().cast::<u8>(), self.len) }
    }

    /// Whole words that lie entirely inside the buffer.
    pub fn as_words(&self) -> &[Word] {
        &self.cells[..self.len / WORD_SIZE]
    }

    /// Tags of every cell, one per word.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Index of the word starting at byte `offset`.
    pub fn word_index(&self, offset: usize) -> Result<usize> {
        if offset & WORD_MASK != 0 {
            return Err(RegionError::Misaligned { offset });
        }
        if offset >= self.len {
            debug!(offset, size = self.len, "word offset rejected");
            return Err(RegionError::OutOfBounds {
                offset,
                len: WORD_SIZE,
                size: self.len,
            });
        }
        Ok(offset / WORD_SIZE)
    }

    /// Tag of cell `word`, if it exists.
    pub fn tag(&self, word: usize) -> Option<Tag> {
        self.tags.get(word).copied()
    }

    /// Tag of the word starting at byte `offset`.
    pub fn tag_at(&self, offset: usize) -> Result<Tag> {
        let word = self.word_index(offset)?;
        Ok(self.tags[word])
    }

    pub fn set_tag(&mut self, word: usize, tag: Tag) -> Result<()> {
        let size = self.tags.len();
        match self.tags.get_mut(word) {
            Some(slot) => {
                *slot = tag;
                Ok(())
            }
            None => {
                debug!(word, cells = size, "tag index rejected");
                Err(RegionError::OutOfBounds {
                    offset: word.saturating_mul(WORD_SIZE),
                    len: WORD_SIZE,
                    size: self.len,
                })
            }
        }
    }

    /// Like [`TaggedMemory::set_tag`], from a raw value.
    pub fn set_tag_bits(&mut self, word: usize, bits: u8) -> Result<()> {
        let tag = Tag::new(bits).ok_or(RegionError::TagOutOfRange { value: bits })?;
        self.set_tag(word, tag)
    }

    /// Copy `len` bytes from offset `src` to offset `dst`, with tags when both
    /// offsets are word-aligned. The ranges must not overlap.
    ///
    /// Returns `dst`.
    pub fn copy(&mut self, dst: usize, src: usize, len: usize) -> Result<usize> {
        self.check_range(dst, len)?;
        self.check_range(src, len)?;
        if ranges_overlap(dst, src, len) {
            debug!(dst, src, len, "overlapping copy rejected");
            return Err(RegionError::Overlap { dst, src, len });
        }
        trace!(dst, src, len, class = ?self.class(dst, src), "copy");

        let base = self.cells.as_mut_ptr();
        let mut port = SliceTags::new(base, &mut self.tags);
        // SAFETY: both ranges are inside `cells`, they do not overlap, and the
        // port covers every cell of the buffer.
        unsafe {
            let bytes = base.cast::<u8>();
            tagged_memcpy(&mut port, bytes.add(dst), bytes.add(src), len);
        }
        Ok(dst)
    }

    /// Move `len` bytes from offset `src` to offset `dst`; the ranges may
    /// overlap. Tags travel under the same rule as [`TaggedMemory::copy`].
    ///
    /// Returns `dst`.
    pub fn move_within(&mut self, dst: usize, src: usize, len: usize) -> Result<usize> {
        self.check_range(dst, len)?;
        self.check_range(src, len)?;
        trace!(dst, src, len, class = ?self.class(dst, src), "move");

        let base = self.cells.as_mut_ptr();
        let mut port = SliceTags::new(base, &mut self.tags);
        // SAFETY: both ranges are inside `cells` and the port covers every cell.
        unsafe {
            let bytes = base.cast::<u8>();
            tagged_memmove(&mut port, bytes.add(dst), bytes.add(src), len);
        }
        Ok(dst)
    }

    /// [`TaggedMemory::copy`] without touching any tag.
    pub fn copy_no_tags(&mut self, dst: usize, src: usize, len: usize) -> Result<usize> {
        self.check_range(dst, len)?;
        self.check_range(src, len)?;
        if ranges_overlap(dst, src, len) {
            debug!(dst, src, len, "overlapping copy rejected");
            return Err(RegionError::Overlap { dst, src, len });
        }
        trace!(dst, src, len, "copy without tags");

        let bytes = self.cells.as_mut_ptr().cast::<u8>();
        // SAFETY: both ranges are inside `cells` and do not overlap.
        unsafe { memcpy_no_tags(bytes.add(dst), bytes.add(src), len) };
        Ok(dst)
    }

    /// [`TaggedMemory::move_within`] without touching any tag.
    pub fn move_no_tags(&mut self, dst: usize, src: usize, len: usize) -> Result<usize> {
        self.check_range(dst, len)?;
        self.check_range(src, len)?;
        trace!(dst, src, len, "move without tags");

        let bytes = self.cells.as_mut_ptr().cast::<u8>();
        // SAFETY: both ranges are inside `cells`.
        unsafe { memmove_no_tags(bytes.add(dst), bytes.add(src), len) };
        Ok(dst)
    }

    /// Copy `len` bytes from offset `src` of `other` to offset `dst` of `self`,
    /// with tags when both offsets are word-aligned.
    ///
    /// Returns `dst`.
    pub fn copy_from(
        &mut self,
        dst: usize,
        other: &TaggedMemory,
        src: usize,
        len: usize,
    ) -> Result<usize> {
        self.check_range(dst, len)?;
        other.check_range(src, len)?;
        trace!(dst, src, len, class = ?self.class(dst, src), "copy across buffers");

        let dst_base = self.cells.as_mut_ptr();
        let src_base = other.cells.as_ptr();
        let mut port = CrossTags::new(src_base, &other.tags, dst_base, &mut self.tags);
        // SAFETY: `&mut self` and `&other` are distinct buffers, both ranges
        // are in bounds, and the port maps each side to its own tag array.
        unsafe {
            tagged_memcpy(
                &mut port,
                dst_base.cast::<u8>().add(dst),
                src_base.cast::<u8>().add(src),
                len,
            );
        }
        Ok(dst)
    }

    /// Alignment class of the whole-word prefix between two offsets. The
    /// buffer itself is word-aligned, so only the offsets matter.
    fn class(&self, dst: usize, src: usize) -> AlignmentClass {
        prefix_class(dst as *const u8, src as *const u8)
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(()),
            _ => {
                debug!(offset, len, size = self.len, "range rejected");
                Err(RegionError::OutOfBounds {
                    offset,
                    len,
                    size: self.len,
                })
            }
        }
    }
}

impl core::fmt::Debug for TaggedMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaggedMemory")
            .field("len", &self.len)
            .field("tagged_cells", &self.tags.iter().filter(|t| **t != Tag::NONE).count())
            .finish()
    }
}
