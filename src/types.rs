//! Word and tag types shared by every copy path.

use core::fmt;

/// Machine word: the unit a tag is attached to.
pub type Word = usize;

/// Size of a [`Word`] in bytes.
pub const WORD_SIZE: usize = core::mem::size_of::<Word>();

/// Low address bits that must be clear for an address to be word-aligned.
pub const WORD_MASK: usize = WORD_SIZE - 1;

/// Number of meaningful bits in a [`Tag`].
pub const TAG_WIDTH: u32 = 4;

/// Out-of-band metadata attached to one word-aligned memory cell.
///
/// The copy routines only transport tag values. What a value means (read-only,
/// write-only, ...) is enforced by the platform, not by this crate.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Tag(u8);

impl Tag {
    /// No effect.
    pub const NONE: Tag = Tag(0);
    /// Fault on write.
    pub const READ_ONLY: Tag = Tag(1);
    /// Fault on read.
    pub const WRITE_ONLY: Tag = Tag(2);
    /// Fault on read or write.
    pub const INVALID: Tag = Tag(3);
    /// No effect, but cleared on write.
    pub const LAZY: Tag = Tag(4);
    /// Largest representable value.
    pub const MAX: Tag = Tag((1 << TAG_WIDTH) - 1);

    /// Returns the tag with value `bits`, or `None` if it does not fit in
    /// [`TAG_WIDTH`] bits.
    #[inline]
    pub const fn new(bits: u8) -> Option<Tag> {
        if bits <= Self::MAX.0 {
            Some(Tag(bits))
        } else {
            None
        }
    }

    /// Keeps only the low [`TAG_WIDTH`] bits of `bits`.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Tag {
        Tag(bits & Self::MAX.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Tag::NONE => f.write_str("Tag::NONE"),
            Tag::READ_ONLY => f.write_str("Tag::READ_ONLY"),
            Tag::WRITE_ONLY => f.write_str("Tag::WRITE_ONLY"),
            Tag::INVALID => f.write_str("Tag::INVALID"),
            Tag::LAZY => f.write_str("Tag::LAZY"),
            Tag(bits) => write!(f, "Tag({bits})"),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.0
    }
}
