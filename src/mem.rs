//! Plain byte copies
//!
//! Safe wrappers over the tag-oblivious routines, for strings and other data
//! whose source tags must never reach the destination.
#![allow(unsafe_code)]

/// Copy bytes from source to destination (non-overlapping)
///
/// Copies bytes from `src` to `dest` without any tag traffic. Returns the
/// number of bytes copied, which is `min(dest.len(), src.len())`.
///
/// # Examples
/// ```
/// use tagcopy::mem::memcpy;
/// let mut dest = [0u8; 5];
/// let src = b"hello";
/// assert_eq!(memcpy(&mut dest, src), 5);
/// assert_eq!(&dest, b"hello");
/// ```
pub fn memcpy(dest: &mut [u8], src: &[u8]) -> usize {
    let n = dest.len().min(src.len());
    if n == 0 {
        return 0;
    }

    // SAFETY: both pointers come from valid slices of at least `n` bytes, and
    // a `&mut` and a `&` slice cannot overlap.
    unsafe { crate::memcpy::memcpy_no_tags(dest.as_mut_ptr(), src.as_ptr(), n) };
    n
}

/// Move bytes within one buffer (overlapping safe)
///
/// Copies up to `n` bytes from offset `src` to offset `dest` inside `buf`,
/// without any tag traffic. The count is clipped so both ranges stay inside
/// the buffer; the number of bytes moved is returned.
///
/// # Examples
/// ```
/// use tagcopy::mem::memmove;
/// let mut buf = *b"abcdef";
/// assert_eq!(memmove(&mut buf, 2, 0, 4), 4);
/// assert_eq!(&buf, b"ababcd");
/// ```
pub fn memmove(buf: &mut [u8], dest: usize, src: usize, n: usize) -> usize {
    let len = buf.len();
    let n = n
        .min(len.saturating_sub(src))
        .min(len.saturating_sub(dest));
    if n == 0 {
        return 0;
    }

    let base = buf.as_mut_ptr();
    // SAFETY: `src + n` and `dest + n` are both within `buf`; memmove_no_tags
    // handles any overlap between them.
    unsafe { crate::memmove::memmove_no_tags(base.add(dest), base.add(src), n) };
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memcpy_lengths() {
        let mut dest = [0u8; 5];
        let src = *b"hello";
        assert_eq!(memcpy(&mut dest, &src), 5);
        assert_eq!(dest, src);

        let mut dest2 = [0u8; 3];
        assert_eq!(memcpy(&mut dest2, &src), 3);
        assert_eq!(&dest2, b"hel");

        assert_eq!(memcpy(&mut [], &src), 0);
    }

    #[test]
    fn test_memcpy_long_unaligned() {
        let src: Vec<u8> = (0..300).map(|i| (i % 251) as u8).collect();
        let mut dest = vec![0u8; 301];
        assert_eq!(memcpy(&mut dest[1..], &src), 300);
        assert_eq!(&dest[1..], &src[..]);
        assert_eq!(dest[0], 0);
    }

    #[test]
    fn test_memmove_overlap_both_ways() {
        let mut buf = *b"abcdef";
        assert_eq!(memmove(&mut buf, 0, 2, 4), 4);
        assert_eq!(&buf, b"cdefef");

        let mut buf: Vec<u8> = (0..200).collect();
        let mut expected = buf.clone();
        memmove(&mut buf, 50, 3, 120);
        expected.copy_within(3..123, 50);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_memmove_clips_to_buffer() {
        let mut buf = *b"abcdef";
        assert_eq!(memmove(&mut buf, 0, 4, 10), 2);
        assert_eq!(&buf, b"efcdef");
        assert_eq!(memmove(&mut buf, 0, 9, 3), 0);
    }
}
