//! Tag load/store ports.
//!
//! The copy routines never touch tag storage directly. They go through a
//! [`TagPort`], which is either the real instruction pair on tagged hardware or
//! a software model of it.
#![allow(unsafe_code)]

use core::cell::Cell;
use std::collections::HashMap;

use crate::types::{Tag, Word};

/// Access to the tag attached to a word-aligned memory cell.
///
/// Implementations must behave like a single instruction: no side effects
/// beyond the one cell addressed.
pub trait TagPort {
    /// Read the tag of the cell at `addr`.
    ///
    /// # Safety
    ///
    /// - `addr` must be word-aligned
    /// - The caller must be permitted to read the cell at `addr`
    unsafe fn load_tag(&self, addr: *const Word) -> Tag;

    /// Set the tag of the cell at `addr`.
    ///
    /// # Safety
    ///
    /// - `addr` must be word-aligned
    /// - The caller must be permitted to write the cell at `addr`
    unsafe fn store_tag(&mut self, addr: *mut Word, tag: Tag);
}

impl<P: TagPort + ?Sized> TagPort for &mut P {
    #[inline(always)]
    unsafe fn load_tag(&self, addr: *const Word) -> Tag {
        // SAFETY: forwarded contract.
        unsafe { (**self).load_tag(addr) }
    }

    #[inline(always)]
    unsafe fn store_tag(&mut self, addr: *mut Word, tag: Tag) {
        // SAFETY: forwarded contract.
        unsafe { (**self).store_tag(addr, tag) }
    }
}

/// Port for targets without tagged memory.
///
/// Every cell reads as [`Tag::NONE`] and stores are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct UntaggedPlatform;

impl TagPort for UntaggedPlatform {
    #[inline(always)]
    unsafe fn load_tag(&self, _addr: *const Word) -> Tag {
        Tag::NONE
    }

    #[inline(always)]
    unsafe fn store_tag(&mut self, _addr: *mut Word, _tag: Tag) {}
}

/// Software tag store keyed by cell address.
///
/// Cells that were never tagged read as [`Tag::NONE`]. Loads and stores are
/// counted so callers can check which paths touched tags at all.
#[derive(Debug, Default)]
pub struct ShadowTags {
    tags: HashMap<usize, Tag>,
    loads: Cell<usize>,
    stores: usize,
}

impl ShadowTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the cell at `addr` without counting it as a store.
    pub fn set(&mut self, addr: *const Word, tag: Tag) {
        debug_assert!(addr.is_aligned());
        if tag == Tag::NONE {
            self.tags.remove(&(addr as usize));
        } else {
            self.tags.insert(addr as usize, tag);
        }
    }

    /// Current tag of the cell at `addr`, without counting it as a load.
    pub fn get(&self, addr: *const Word) -> Tag {
        self.tags
            .get(&(addr as usize))
            .copied()
            .unwrap_or(Tag::NONE)
    }

    /// Tags of `len` consecutive cells starting at `base`.
    pub fn snapshot(&self, base: *const Word, len: usize) -> Vec<Tag> {
        (0..len).map(|i| self.get(base.wrapping_add(i))).collect()
    }

    /// Number of cells carrying a tag other than [`Tag::NONE`].
    pub fn tagged_cells(&self) -> usize {
        self.tags.len()
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    pub fn stores(&self) -> usize {
        self.stores
    }

    pub fn reset_counters(&mut self) {
        self.loads.set(0);
        self.stores = 0;
    }
}

impl TagPort for ShadowTags {
    unsafe fn load_tag(&self, addr: *const Word) -> Tag {
        self.loads.set(self.loads.get() + 1);
        self.get(addr)
    }

    unsafe fn store_tag(&mut self, addr: *mut Word, tag: Tag) {
        self.stores += 1;
        self.set(addr, tag);
    }
}

/// Port backed by a tag slice covering one contiguous run of words.
///
/// `base` is the address of the word whose tag is `tags[0]`. Used by
/// [`crate::region::TaggedMemory`], where data and tags live side by side.
#[derive(Debug)]
pub struct SliceTags<'a> {
    base: usize,
    tags: &'a mut [Tag],
}

impl<'a> SliceTags<'a> {
    pub fn new(base: *const Word, tags: &'a mut [Tag]) -> Self {
        Self {
            base: base as usize,
            tags,
        }
    }

    #[inline(always)]
    fn index(&self, addr: usize) -> usize {
        (addr - self.base) / core::mem::size_of::<Word>()
    }
}

impl TagPort for SliceTags<'_> {
    #[inline(always)]
    unsafe fn load_tag(&self, addr: *const Word) -> Tag {
        self.tags[self.index(addr as usize)]
    }

    #[inline(always)]
    unsafe fn store_tag(&mut self, addr: *mut Word, tag: Tag) {
        let i = self.index(addr as usize);
        self.tags[i] = tag;
    }
}

/// Port that reads tags from one word run and writes them to another.
///
/// Used for copies between two distinct buffers: every load addresses the
/// source run and every store addresses the destination run.
#[derive(Debug)]
pub struct CrossTags<'a> {
    src: SliceView<'a>,
    dst: SliceTags<'a>,
}

#[derive(Debug)]
struct SliceView<'a> {
    base: usize,
    tags: &'a [Tag],
}

impl<'a> CrossTags<'a> {
    pub fn new(
        src_base: *const Word,
        src_tags: &'a [Tag],
        dst_base: *const Word,
        dst_tags: &'a mut [Tag],
    ) -> Self {
        Self {
            src: SliceView {
                base: src_base as usize,
                tags: src_tags,
            },
            dst: SliceTags::new(dst_base, dst_tags),
        }
    }
}

impl TagPort for CrossTags<'_> {
    #[inline(always)]
    unsafe fn load_tag(&self, addr: *const Word) -> Tag {
        self.src.tags[(addr as usize - self.src.base) / core::mem::size_of::<Word>()]
    }

    #[inline(always)]
    unsafe fn store_tag(&mut self, addr: *mut Word, tag: Tag) {
        // SAFETY: forwarded contract.
        unsafe { self.dst.store_tag(addr, tag) }
    }
}

/// Hardware port using the LowRISC `ltag`/`stag` instructions.
#[cfg(all(target_arch = "riscv64", feature = "lowrisc"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct LowriscTags;

#[cfg(all(target_arch = "riscv64", feature = "lowrisc"))]
impl TagPort for LowriscTags {
    #[inline(always)]
    unsafe fn load_tag(&self, addr: *const Word) -> Tag {
        let rv: usize;
        // SAFETY: caller guarantees `addr` is an aligned, readable cell.
        unsafe {
            core::arch::asm!(
                "ltag {rv}, 0({addr})",
                rv = out(reg) rv,
                addr = in(reg) addr,
                options(nostack, readonly, preserves_flags)
            );
        }
        Tag::from_bits_truncate(rv as u8)
    }

    #[inline(always)]
    unsafe fn store_tag(&mut self, addr: *mut Word, tag: Tag) {
        // SAFETY: caller guarantees `addr` is an aligned, writable cell.
        unsafe {
            core::arch::asm!(
                "stag {tag}, 0({addr})",
                tag = in(reg) tag.bits() as usize,
                addr = in(reg) addr,
                options(nostack, preserves_flags)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_defaults_to_none() {
        let cells = [0 as Word; 2];
        let shadow = ShadowTags::new();
        assert_eq!(shadow.get(cells.as_ptr()), Tag::NONE);
        assert_eq!(shadow.tagged_cells(), 0);
    }

    #[test]
    fn test_shadow_counts_port_accesses_only() {
        let mut cells = [0 as Word; 2];
        let mut shadow = ShadowTags::new();
        shadow.set(cells.as_ptr(), Tag::READ_ONLY);
        assert_eq!(shadow.loads(), 0);

        unsafe {
            let t = shadow.load_tag(cells.as_ptr());
            shadow.store_tag(cells.as_mut_ptr().add(1), t);
        }
        assert_eq!(shadow.loads(), 1);
        assert_eq!(shadow.stores(), 1);
        assert_eq!(
            shadow.snapshot(cells.as_ptr(), 2),
            vec![Tag::READ_ONLY, Tag::READ_ONLY]
        );

        shadow.reset_counters();
        assert_eq!((shadow.loads(), shadow.stores()), (0, 0));
    }

    #[test]
    fn test_shadow_storing_none_clears_cell() {
        let cells = [0 as Word; 1];
        let mut shadow = ShadowTags::new();
        shadow.set(cells.as_ptr(), Tag::LAZY);
        assert_eq!(shadow.tagged_cells(), 1);
        shadow.set(cells.as_ptr(), Tag::NONE);
        assert_eq!(shadow.tagged_cells(), 0);
    }

    #[test]
    fn test_slice_tags_index_by_address() {
        let mut cells = [0 as Word; 4];
        let mut tags = [Tag::NONE; 4];
        let mut port = SliceTags::new(cells.as_ptr(), &mut tags);
        unsafe {
            port.store_tag(cells.as_mut_ptr().add(2), Tag::WRITE_ONLY);
            assert_eq!(port.load_tag(cells.as_ptr().add(2)), Tag::WRITE_ONLY);
        }
        assert_eq!(tags[2], Tag::WRITE_ONLY);
    }

    #[test]
    fn test_cross_tags_reads_src_writes_dst() {
        let src = [0 as Word; 2];
        let mut dst = [0 as Word; 2];
        let src_tags = [Tag::INVALID, Tag::LAZY];
        let mut dst_tags = [Tag::NONE; 2];
        let mut port = CrossTags::new(src.as_ptr(), &src_tags, dst.as_ptr(), &mut dst_tags);
        unsafe {
            let t = port.load_tag(src.as_ptr().add(1));
            port.store_tag(dst.as_mut_ptr(), t);
        }
        assert_eq!(dst_tags, [Tag::LAZY, Tag::NONE]);
    }

    #[test]
    fn test_untagged_platform_reads_none() {
        let mut cell = [7 as Word];
        let mut port = UntaggedPlatform;
        unsafe {
            port.store_tag(cell.as_mut_ptr(), Tag::INVALID);
            assert_eq!(port.load_tag(cell.as_ptr()), Tag::NONE);
        }
    }
}
