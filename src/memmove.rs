//! Overlap-safe memmove with tag propagation tied to the copy direction.
#![allow(unsafe_code)]

use crate::align::{AlignmentClass, co_aligned, prefix_class, split_at_words};
use crate::bytecopy::copy_bytes;
use crate::memcpy::{copy_tagged_forward, memcpy_no_tags};
use crate::overlap::Direction;
use crate::tag::TagPort;
use crate::types::{WORD_SIZE, Word};
use crate::unroll::{BACKWARD_GROUP, TAGGED_GROUP, bulk_backward, bulk_forward};
use crate::wordcopy::{Tagged, Untagged};

/// Move `n` bytes and, where the operands allow it, their tags. Regions may
/// overlap.
///
/// Tags follow the same rule as [`crate::memcpy::tagged_memcpy`]: with both
/// pointers word-aligned, whole words travel with their tags and the trailing
/// bytes without. The copy direction picked for the data is the direction the
/// tags travel in, so a tag is never read after its cell was overwritten.
///
/// Returns `dest`.
///
/// # Safety
///
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
/// - `port` must be able to access the tags of every whole word involved
#[inline]
pub unsafe fn tagged_memmove<P: TagPort>(
    port: &mut P,
    dest: *mut u8,
    src: *const u8,
    n: usize,
) -> *mut u8 {
    if n == 0 || core::ptr::eq(dest as *const u8, src) {
        return dest;
    }

    if prefix_class(dest, src) == AlignmentClass::Unaligned {
        // SAFETY: forwarded contract.
        return unsafe { memmove_no_tags(dest, src, n) };
    }

    match Direction::resolve(dest, src, n) {
        // Disjoint, or dest below src: the memcpy path is safe and keeps the
        // working set small.
        // SAFETY: word-aligned operands; forward tolerates dest <= src.
        Direction::Forward => unsafe { copy_tagged_forward(port, dest, src, n) },
        Direction::Backward => {
            let words = n / WORD_SIZE;
            let done = words * WORD_SIZE;
            // SAFETY: dest > src here, so descending order reads every source
            // byte before it can be overwritten. Trailing bytes sit highest and
            // go first.
            unsafe {
                copy_bytes(dest.add(done), src.add(done), n - done, Direction::Backward);
                bulk_backward::<_, BACKWARD_GROUP>(
                    &mut Tagged(port),
                    dest.cast::<Word>(),
                    src.cast::<Word>(),
                    words,
                );
            }
            dest
        }
    }
}

/// Move `n` bytes without reading or writing any tag. Regions may overlap.
///
/// Returns `dest`.
///
/// # Safety
///
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
#[inline]
pub unsafe fn memmove_no_tags(dest: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    match Direction::resolve(dest, src, n) {
        // SAFETY: forward pieces tolerate dest <= src.
        Direction::Forward => unsafe { memcpy_no_tags(dest, src, n) },
        Direction::Backward => {
            // SAFETY: dest > src; forwarded contract.
            unsafe { move_backward_no_tags(dest, src, n) };
            dest
        }
    }
}

/// Descending mirror of `memcpy_no_tags`: trailing bytes, whole words, then
/// leading bytes.
///
/// # Safety
///
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
/// - The regions must be disjoint or satisfy `dest >= src`
#[inline(always)]
unsafe fn move_backward_no_tags(dest: *mut u8, src: *const u8, n: usize) {
    if n < WORD_SIZE || !co_aligned(dest, src) {
        // SAFETY: forwarded contract.
        unsafe { copy_bytes(dest, src, n, Direction::Backward) };
        return;
    }

    let split = split_at_words(dest, n);
    let body = split.head + split.word_bytes();
    // SAFETY: head + words + tail == n; co-aligned pointers are both on a word
    // boundary after `head` bytes.
    unsafe {
        copy_bytes(dest.add(body), src.add(body), split.tail, Direction::Backward);
        bulk_backward::<_, BACKWARD_GROUP>(
            &mut Untagged,
            dest.add(split.head).cast::<Word>(),
            src.add(split.head).cast::<Word>(),
            split.words,
        );
        copy_bytes(dest, src, split.head, Direction::Backward);
    }
}

/// Move `words` words with their tags. Regions may overlap.
///
/// Returns `dest`.
///
/// # Safety
///
/// - `dest` and `src` must be word-aligned and valid for `words` words
#[inline]
pub unsafe fn memmove_tagged_words<P: TagPort>(
    port: &mut P,
    dest: *mut Word,
    src: *const Word,
    words: usize,
) -> *mut Word {
    let direction = Direction::resolve(dest.cast::<u8>(), src.cast::<u8>(), words * WORD_SIZE);
    let mut unit = Tagged(port);
    // SAFETY: the direction satisfies the overlap requirement of each engine.
    unsafe {
        match direction {
            Direction::Forward => bulk_forward::<_, TAGGED_GROUP>(&mut unit, dest, src, words),
            Direction::Backward => bulk_backward::<_, BACKWARD_GROUP>(&mut unit, dest, src, words),
        }
    }
    dest
}
