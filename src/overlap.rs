//! Copy direction selection for overlap-safe moves.

/// Address order in which a transfer visits its units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Low to high addresses.
    Forward,
    /// High to low addresses.
    Backward,
}

impl Direction {
    /// Pick the direction that never reads a source byte after it has been
    /// overwritten.
    ///
    /// `dst - src` is taken modulo the address width, so a destination below
    /// the source wraps to a huge distance and lands in the forward branch
    /// together with the disjoint cases. Only a destination strictly inside
    /// `(src, src + len)` copies backward.
    #[inline(always)]
    pub fn resolve(dst: *const u8, src: *const u8, len: usize) -> Direction {
        if (dst as usize).wrapping_sub(src as usize) >= len {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// How two equally long ranges relate, computed once per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapRelation {
    /// The ranges share at least one byte.
    pub overlapping: bool,
    /// Direction a move between them must use.
    pub direction: Direction,
}

impl OverlapRelation {
    #[inline]
    pub fn of(dst: *const u8, src: *const u8, len: usize) -> OverlapRelation {
        let d = dst as usize;
        let s = src as usize;
        OverlapRelation {
            overlapping: ranges_overlap(d, s, len),
            direction: Direction::resolve(dst, src, len),
        }
    }
}

/// Whether `[a, a + len)` and `[b, b + len)` intersect.
#[inline]
pub fn ranges_overlap(a: usize, b: usize, len: usize) -> bool {
    len != 0 && a.abs_diff(b) < len
}
