//! Handles to heap objects.

use std::fmt;

/// Jump target in the instruction stream.
pub type Label = u64;

/// Handle to a heap object. Copy-able, 8 bytes.
///
/// `index` selects the slot in the heap arena; `generation` changes every
/// time that slot is released, so a handle kept past the sweep that freed
/// its object is detected on access instead of aliasing a newer object.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ValueRef {
    index: u32,
    generation: u32,
}

impl ValueRef {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        ValueRef { index, generation }
    }

    /// Slot index in the heap arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot index as stored in the handle.
    #[inline]
    pub const fn raw_index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueRef({}/{})", self.index, self.generation)
    }
}

const _: () = assert!(std::mem::size_of::<ValueRef>() == 8);
