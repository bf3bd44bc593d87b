//! Byte-at-a-time transport. Never touches tags.
#![allow(unsafe_code)]

use crate::overlap::Direction;

/// Copy `n` bytes one at a time in the given direction.
///
/// # Safety
///
/// - `dest` must be valid for writes and `src` for reads of `n` bytes
/// - `Forward` requires the ranges to be disjoint or `dest <= src`
/// - `Backward` requires the ranges to be disjoint or `dest >= src`
#[inline(always)]
pub unsafe fn copy_bytes(dest: *mut u8, src: *const u8, n: usize, direction: Direction) {
    match direction {
        // SAFETY: forwarded contract.
        Direction::Forward => unsafe { copy_bytes_forward(dest, src, n) },
        // SAFETY: forwarded contract.
        Direction::Backward => unsafe { copy_bytes_backward(dest, src, n) },
    }
}

#[inline(always)]
unsafe fn copy_bytes_forward(dest: *mut u8, src: *const u8, n: usize) {
    let mut i = 0;
    while i < n {
        // SAFETY: i < n; each byte is read before the write at the same index,
        // and with dest <= src no later read sits below this write.
        unsafe { *dest.add(i) = *src.add(i) };
        i += 1;
    }
}

#[inline(always)]
unsafe fn copy_bytes_backward(dest: *mut u8, src: *const u8, n: usize) {
    let mut i = n;
    while i > 0 {
        i -= 1;
        // SAFETY: i < n; with dest >= src no later read sits above this write.
        unsafe { *dest.add(i) = *src.add(i) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_bytes_disjoint() {
        let src = *b"tagged words";
        for direction in [Direction::Forward, Direction::Backward] {
            let mut dst = [0u8; 12];
            unsafe { copy_bytes(dst.as_mut_ptr(), src.as_ptr(), src.len(), direction) };
            assert_eq!(&dst, &src);
        }
    }

    #[test]
    fn test_copy_bytes_zero_len() {
        let src = [1u8; 4];
        let mut dst = [9u8; 4];
        unsafe { copy_bytes(dst.as_mut_ptr(), src.as_ptr(), 0, Direction::Forward) };
        assert_eq!(dst, [9u8; 4]);
    }

    #[test]
    fn test_forward_shift_down() {
        let mut buf = *b"abcdef";
        unsafe {
            let p = buf.as_mut_ptr();
            copy_bytes(p, p.add(2), 4, Direction::Forward);
        }
        assert_eq!(&buf, b"cdefef");
    }

    #[test]
    fn test_backward_shift_up() {
        let mut buf = *b"abcdef";
        unsafe {
            let p = buf.as_mut_ptr();
            copy_bytes(p.add(2), p, 4, Direction::Backward);
        }
        assert_eq!(&buf, b"ababcd");
    }
}
