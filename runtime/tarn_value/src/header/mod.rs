//! Object header word and GC color.
//!
//! Layout of the 64-bit header:
//!
//! ```text
//! 63                                 8 7        0
//! +-----------------------------------+----------+
//! |              tag                  |  color   |
//! +-----------------------------------+----------+
//! ```
//!
//! Tag and color live in disjoint bit ranges; every setter preserves the
//! other field.

use std::fmt;

use crate::tag::{Tag, UnknownTag};

const COLOR_BITS: u32 = 8;
const COLOR_MASK: u64 = 0xff;

/// GC mark state of an object.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Color {
    /// Not (yet) reached in the current cycle. The resting state between cycles.
    #[default]
    White = 0,
    /// Reached and queued for tracing.
    Gray = 1,
    /// Reached and traced.
    Black = 2,
}

impl Color {
    /// Decode a raw color byte.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::White),
            1 => Some(Self::Gray),
            2 => Some(Self::Black),
            _ => None,
        }
    }

    /// Returns `true` once the object has been reached this cycle.
    #[inline]
    pub const fn is_marked(self) -> bool {
        !matches!(self, Self::White)
    }
}

/// Packed tag + color word at the front of every heap object.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Header(u64);

impl Header {
    /// Create a header for a freshly allocated object.
    #[inline]
    pub const fn new(tag: Tag, color: Color) -> Self {
        Header((tag.raw() << COLOR_BITS) | color as u64)
    }

    /// Reinterpret a raw header word.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Header(raw)
    }

    /// The raw header word.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The tag bits, undecoded.
    #[inline]
    pub const fn raw_tag(self) -> u64 {
        self.0 >> COLOR_BITS
    }

    /// Decode the tag bits.
    #[inline]
    pub const fn try_tag(self) -> Result<Tag, UnknownTag> {
        Tag::from_raw(self.raw_tag())
    }

    /// Decode the tag bits.
    ///
    /// # Panics
    ///
    /// Panics if the tag bits are outside the closed tag set; the heap is
    /// corrupt at that point and nothing downstream can be trusted.
    #[inline]
    pub fn tag(self) -> Tag {
        match self.try_tag() {
            Ok(tag) => tag,
            Err(err) => panic!("corrupt object header {:#018x}: {err}", self.0),
        }
    }

    #[inline]
    pub fn set_tag(&mut self, tag: Tag) {
        self.set_raw_tag(tag.raw());
    }

    /// Overwrite the tag bits. Bits of `tag` above bit 55 are discarded.
    #[inline]
    pub fn set_raw_tag(&mut self, tag: u64) {
        self.0 = (tag << COLOR_BITS) | (self.0 & COLOR_MASK);
    }

    /// The color byte, undecoded.
    #[inline]
    pub const fn raw_color(self) -> u8 {
        (self.0 & COLOR_MASK) as u8
    }

    /// Decode the color byte.
    ///
    /// # Panics
    ///
    /// Panics on a color byte outside [`Color`], which indicates heap corruption.
    #[inline]
    pub fn color(self) -> Color {
        match Color::from_raw(self.raw_color()) {
            Some(color) => color,
            None => panic!(
                "corrupt object header {:#018x}: unknown color {}",
                self.0,
                self.raw_color()
            ),
        }
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.set_raw_color(color as u8);
    }

    #[inline]
    pub fn set_raw_color(&mut self, color: u8) {
        self.0 = u64::from(color) | (self.0 & !COLOR_MASK);
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.try_tag(), Color::from_raw(self.raw_color())) {
            (Ok(tag), Some(color)) => write!(f, "Header({tag}, {color:?})"),
            _ => write!(f, "Header({:#018x})", self.0),
        }
    }
}
