//! Word transport: one aligned word per step, with or without its tag.
#![allow(unsafe_code)]

use crate::overlap::Direction;
use crate::tag::TagPort;
use crate::types::{Tag, Word};

/// One word-sized transfer step, split into a load half and a store half so
/// the unroll engine can batch several loads ahead of their stores.
pub trait WordUnit {
    /// Everything read from a source cell.
    type Cell: Copy;

    /// # Safety
    ///
    /// `src` must be word-aligned and readable.
    unsafe fn load(&self, src: *const Word) -> Self::Cell;

    /// # Safety
    ///
    /// `dst` must be word-aligned and writable.
    unsafe fn store(&mut self, dst: *mut Word, cell: Self::Cell);

    /// Copy a single word.
    ///
    /// # Safety
    ///
    /// Both pointers must be word-aligned and valid for one word.
    #[inline(always)]
    unsafe fn transfer(&mut self, dst: *mut Word, src: *const Word) {
        // SAFETY: forwarded contract.
        unsafe {
            let cell = self.load(src);
            self.store(dst, cell);
        }
    }
}

/// Data plus tag. The data store lands before the tag store, and both land
/// before the next word is touched.
pub struct Tagged<P>(pub P);

impl<P: TagPort> WordUnit for Tagged<P> {
    type Cell = (Word, Tag);

    #[inline(always)]
    unsafe fn load(&self, src: *const Word) -> (Word, Tag) {
        // SAFETY: caller guarantees `src` is an aligned readable cell.
        unsafe { (src.read(), self.0.load_tag(src)) }
    }

    #[inline(always)]
    unsafe fn store(&mut self, dst: *mut Word, (data, tag): (Word, Tag)) {
        // SAFETY: caller guarantees `dst` is an aligned writable cell.
        unsafe {
            dst.write(data);
            self.0.store_tag(dst, tag);
        }
    }
}

/// Data only. The tag port is never consulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Untagged;

impl WordUnit for Untagged {
    type Cell = Word;

    #[inline(always)]
    unsafe fn load(&self, src: *const Word) -> Word {
        // SAFETY: caller guarantees `src` is an aligned readable cell.
        unsafe { src.read() }
    }

    #[inline(always)]
    unsafe fn store(&mut self, dst: *mut Word, data: Word) {
        // SAFETY: caller guarantees `dst` is an aligned writable cell.
        unsafe { dst.write(data) }
    }
}

/// Copy `words` words one at a time in the given direction.
///
/// # Safety
///
/// - `dst` and `src` must be word-aligned and valid for `words` words
/// - `Forward` requires disjoint ranges or `dst <= src`
/// - `Backward` requires disjoint ranges or `dst >= src`
#[inline]
pub unsafe fn copy_words<U: WordUnit>(
    unit: &mut U,
    dst: *mut Word,
    src: *const Word,
    words: usize,
    direction: Direction,
) {
    match direction {
        Direction::Forward => {
            for i in 0..words {
                // SAFETY: i < words.
                unsafe { unit.transfer(dst.add(i), src.add(i)) };
            }
        }
        Direction::Backward => {
            for i in (0..words).rev() {
                // SAFETY: i < words.
                unsafe { unit.transfer(dst.add(i), src.add(i)) };
            }
        }
    }
}

/// Copy `words` words together with their tags, one word per step.
///
/// # Safety
///
/// Same as [`copy_words`].
#[inline]
pub unsafe fn copy_tagged_words<P: TagPort>(
    port: &mut P,
    dst: *mut Word,
    src: *const Word,
    words: usize,
    direction: Direction,
) {
    // SAFETY: forwarded contract.
    unsafe { copy_words(&mut Tagged(port), dst, src, words, direction) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::ShadowTags;

    fn tagged_source(shadow: &mut ShadowTags, src: &[Word]) {
        for (i, cell) in src.iter().enumerate() {
            shadow.set(cell, Tag::from_bits_truncate(i as u8 + 1));
        }
    }

    #[test]
    fn test_tagged_words_disjoint() {
        let src: [Word; 5] = [10, 20, 30, 40, 50];
        let mut dst = [0 as Word; 5];
        let mut shadow = ShadowTags::new();
        tagged_source(&mut shadow, &src);

        for direction in [Direction::Forward, Direction::Backward] {
            dst.fill(0);
            unsafe {
                copy_tagged_words(&mut shadow, dst.as_mut_ptr(), src.as_ptr(), 5, direction)
            };
            assert_eq!(dst, src);
            assert_eq!(
                shadow.snapshot(dst.as_ptr(), 5),
                shadow.snapshot(src.as_ptr(), 5)
            );
        }
    }

    #[test]
    fn test_one_load_and_store_per_word() {
        let src: [Word; 3] = [1, 2, 3];
        let mut dst = [0 as Word; 3];
        let mut shadow = ShadowTags::new();
        unsafe {
            copy_tagged_words(&mut shadow, dst.as_mut_ptr(), src.as_ptr(), 3, Direction::Forward)
        };
        assert_eq!(shadow.loads(), 3);
        assert_eq!(shadow.stores(), 3);
    }

    #[test]
    fn test_backward_shift_moves_tags_up() {
        let mut buf: [Word; 4] = [1, 2, 3, 0];
        let mut shadow = ShadowTags::new();
        tagged_source(&mut shadow, &buf[..3]);

        unsafe {
            let p = buf.as_mut_ptr();
            copy_tagged_words(&mut shadow, p.add(1), p, 3, Direction::Backward);
        }
        assert_eq!(buf, [1, 1, 2, 3]);
        assert_eq!(
            shadow.snapshot(buf.as_ptr(), 4),
            vec![
                Tag::from_bits_truncate(1),
                Tag::from_bits_truncate(1),
                Tag::from_bits_truncate(2),
                Tag::from_bits_truncate(3),
            ]
        );
    }

    #[test]
    fn test_untagged_leaves_tags_alone() {
        let src: [Word; 2] = [7, 8];
        let mut dst = [0 as Word; 2];
        let mut shadow = ShadowTags::new();
        shadow.set(dst.as_ptr(), Tag::READ_ONLY);
        unsafe {
            copy_words(&mut Untagged, dst.as_mut_ptr(), src.as_ptr(), 2, Direction::Forward)
        };
        assert_eq!(dst, src);
        assert_eq!(shadow.get(dst.as_ptr()), Tag::READ_ONLY);
    }
}
