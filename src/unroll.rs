//! Bulk unroll engine: fixed-size groups of word units per loop iteration.
//!
//! Each iteration loads a whole group before storing any of it, then a
//! single-word loop picks up the remainder. The result is identical to running
//! the unit once per word; the grouping only amortizes loop control.
//!
//! Loading a group ahead of its stores keeps the ascending loop correct when
//! `dst <= src` and the descending loop correct when `dst >= src`, which is
//! what lets `memmove` reuse the forward path for downward shifts.
#![allow(unsafe_code)]

use crate::types::Word;
use crate::wordcopy::WordUnit;

/// Group width for tag-propagating forward copies. Each word in flight needs
/// a register for its tag as well as its data, so stay narrow.
pub const TAGGED_GROUP: usize = 4;

/// Group width for plain word forward copies.
pub const UNTAGGED_GROUP: usize = 9;

/// Group width for descending copies, tagged or not.
pub const BACKWARD_GROUP: usize = 4;

/// Copy `words` words low to high, `GROUP` at a time.
///
/// # Safety
///
/// - `dst` and `src` must be word-aligned and valid for `words` words
/// - The ranges must be disjoint or satisfy `dst <= src`
#[inline]
pub unsafe fn bulk_forward<U: WordUnit, const GROUP: usize>(
    unit: &mut U,
    dst: *mut Word,
    src: *const Word,
    words: usize,
) {
    let mut i = 0;
    while words - i >= GROUP {
        // SAFETY: i + GROUP <= words.
        let group: [U::Cell; GROUP] =
            core::array::from_fn(|k| unsafe { unit.load(src.add(i + k)) });
        for (k, cell) in group.into_iter().enumerate() {
            // SAFETY: i + k < words.
            unsafe { unit.store(dst.add(i + k), cell) };
        }
        i += GROUP;
    }

    while i < words {
        // SAFETY: i < words.
        unsafe { unit.transfer(dst.add(i), src.add(i)) };
        i += 1;
    }
}

/// Copy `words` words high to low, `GROUP` at a time.
///
/// # Safety
///
/// - `dst` and `src` must be word-aligned and valid for `words` words
/// - The ranges must be disjoint or satisfy `dst >= src`
#[inline]
pub unsafe fn bulk_backward<U: WordUnit, const GROUP: usize>(
    unit: &mut U,
    dst: *mut Word,
    src: *const Word,
    words: usize,
) {
    let mut end = words;
    while end >= GROUP {
        let base = end - GROUP;
        // SAFETY: base + GROUP == end <= words.
        let group: [U::Cell; GROUP] =
            core::array::from_fn(|k| unsafe { unit.load(src.add(base + k)) });
        for (k, cell) in group.into_iter().enumerate().rev() {
            // SAFETY: base + k < end.
            unsafe { unit.store(dst.add(base + k), cell) };
        }
        end = base;
    }

    while end > 0 {
        end -= 1;
        // SAFETY: end < words.
        unsafe { unit.transfer(dst.add(end), src.add(end)) };
    }
}
