//! tagcopy: memcpy/memmove for memory where every word carries a tag.
//!
//! Each word-aligned cell holds a small out-of-band tag the platform uses for
//! access control. [`tagged_memcpy`] and [`tagged_memmove`] copy bytes exactly
//! like their libc namesakes and also carry the tag of every whole word when
//! both operands are word-aligned. Unaligned transfers fall back to
//! [`memcpy_no_tags`]/[`memmove_no_tags`], which never touch tags.
//!
//! Tag storage is reached through a [`TagPort`]: [`tag::ShadowTags`] models it
//! in software, [`tag::UntaggedPlatform`] stands in on ordinary hardware, and
//! `tag::LowriscTags` (feature `lowrisc`, riscv64 only) uses the `ltag`/`stag`
//! instructions. [`TaggedMemory`] wraps all of it behind bounds-checked offsets.

pub mod align;
pub mod bytecopy;
pub mod error;
pub mod mem;
pub mod memcpy;
pub mod memmove;
pub mod overlap;
pub mod region;
pub mod tag;
pub mod types;
pub mod unroll;
pub mod wordcopy;

pub use error::RegionError;
pub use memcpy::{memcpy_no_tags, memcpy_tagged_words, tagged_memcpy};
pub use memmove::{memmove_no_tags, memmove_tagged_words, tagged_memmove};
pub use region::TaggedMemory;
pub use tag::TagPort;
pub use types::{Tag, WORD_SIZE, Word};
