//! Tag-propagating memcpy with a tag-oblivious fallback.
#![allow(unsafe_code)]

use crate::align::{AlignmentClass, co_aligned, prefix_class, split_at_words};
use crate::bytecopy::copy_bytes;
use crate::overlap::Direction;
use crate::tag::TagPort;
use crate::types::{WORD_SIZE, Word};
use crate::unroll::{TAGGED_GROUP, UNTAGGED_GROUP, bulk_forward};
use crate::wordcopy::{Tagged, Untagged};

/// Copy `n` bytes and, where the operands allow it, their tags.
///
/// When `dest` and `src` are both word-aligned, every whole word of the
/// transfer is copied together with its tag and any trailing `n % WORD_SIZE`
/// bytes are copied without tags. Otherwise this is [`memcpy_no_tags`].
///
/// Returns `dest`.
///
/// # Safety
///
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
/// - The memory regions must not overlap
/// - `port` must be able to access the tags of every whole word involved
#[inline]
pub unsafe fn tagged_memcpy<P: TagPort>(
    port: &mut P,
    dest: *mut u8,
    src: *const u8,
    n: usize,
) -> *mut u8 {
    match prefix_class(dest, src) {
        // SAFETY: forwarded contract.
        AlignmentClass::WordAligned => unsafe { copy_tagged_forward(port, dest, src, n) },
        // SAFETY: forwarded contract.
        AlignmentClass::Unaligned => unsafe { memcpy_no_tags(dest, src, n) },
    }
}

/// Ascending tagged copy of the whole words of `n`, then the trailing bytes.
///
/// Also the forward path of [`crate::memmove::tagged_memmove`]: every step
/// reads before it writes and never writes above what it has read, so
/// `dest <= src` overlap is tolerated.
///
/// # Safety
///
/// - `dest` and `src` must be word-aligned
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
/// - The regions must be disjoint or satisfy `dest <= src`
#[inline(always)]
pub(crate) unsafe fn copy_tagged_forward<P: TagPort>(
    port: &mut P,
    dest: *mut u8,
    src: *const u8,
    n: usize,
) -> *mut u8 {
    let words = n / WORD_SIZE;
    let done = words * WORD_SIZE;
    // SAFETY: both pointers are word-aligned and cover `words` whole words;
    // the tail stays inside the `n` bytes the caller vouched for.
    unsafe {
        bulk_forward::<_, TAGGED_GROUP>(
            &mut Tagged(port),
            dest.cast::<Word>(),
            src.cast::<Word>(),
            words,
        );
        copy_bytes(dest.add(done), src.add(done), n - done, Direction::Forward);
    }
    dest
}

/// Copy `n` bytes without reading or writing any tag.
///
/// Destination tags are left as they were. Use this for strings, floats and
/// other plain data whose source tags must not leak into the destination.
///
/// Returns `dest`.
///
/// # Safety
///
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
/// - The regions must be disjoint or satisfy `dest <= src`
#[inline]
pub unsafe fn memcpy_no_tags(dest: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    if n < WORD_SIZE || !co_aligned(dest, src) {
        // SAFETY: forwarded contract.
        unsafe { copy_bytes(dest, src, n, Direction::Forward) };
        return dest;
    }

    // Same offset within a word: bytes up to the first boundary, then whole
    // words, then the leftover bytes.
    let split = split_at_words(dest, n);
    let body = split.head + split.word_bytes();
    // SAFETY: head + words + tail == n, and after `head` bytes both pointers
    // sit on a word boundary because they are co-aligned.
    unsafe {
        copy_bytes(dest, src, split.head, Direction::Forward);
        bulk_forward::<_, UNTAGGED_GROUP>(
            &mut Untagged,
            dest.add(split.head).cast::<Word>(),
            src.add(split.head).cast::<Word>(),
            split.words,
        );
        copy_bytes(dest.add(body), src.add(body), split.tail, Direction::Forward);
    }
    dest
}

/// Copy `words` words with their tags. Use this for structures that may hold
/// tagged pointers.
///
/// Returns `dest`.
///
/// # Safety
///
/// - `dest` and `src` must be word-aligned and valid for `words` words
/// - The regions must not overlap
#[inline]
pub unsafe fn memcpy_tagged_words<P: TagPort>(
    port: &mut P,
    dest: *mut Word,
    src: *const Word,
    words: usize,
) -> *mut Word {
    // SAFETY: forwarded contract.
    unsafe { bulk_forward::<_, TAGGED_GROUP>(&mut Tagged(port), dest, src, words) };
    dest
}
