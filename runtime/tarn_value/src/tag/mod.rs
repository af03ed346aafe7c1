//! Object kind tag for tag-driven dispatch.
//!
//! Every heap object carries a `Tag` in the upper bits of its header word.
//! The set of tags is closed: a header whose tag bits decode to anything
//! else means the heap is corrupt.
//!
//! # Encoding
//!
//! Tags start at [`RESERVED_TAG`] so that small integers remain free for
//! user-level tagged-union discriminants (see [`Tag::Tagged`]), which are
//! stored in the payload rather than the header.

use std::fmt;

use thiserror::Error;

/// First raw value used by object tags.
pub const RESERVED_TAG: u64 = 0xffff;

/// Object kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u64)]
pub enum Tag {
    /// 64-bit signed integer.
    Int = RESERVED_TAG,
    /// 64-bit floating point.
    Double = RESERVED_TAG + 1,
    /// Raw byte string.
    Str = RESERVED_TAG + 2,
    /// Growable vector of integers.
    VectorInt = RESERVED_TAG + 3,
    /// Bare jump target.
    Label = RESERVED_TAG + 4,
    /// Two references (`lhs`, `rhs`).
    Pair = RESERVED_TAG + 5,
    /// User-level tag word plus one reference.
    Tagged = RESERVED_TAG + 6,
    /// Captured environment plus entry label.
    Closure = RESERVED_TAG + 7,
}

/// A raw tag word outside the closed set of object tags.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown object tag {0:#x}")]
pub struct UnknownTag(pub u64);

impl Tag {
    /// Every tag, in discriminant order.
    pub const ALL: [Tag; 8] = [
        Tag::Int,
        Tag::Double,
        Tag::Str,
        Tag::VectorInt,
        Tag::Label,
        Tag::Pair,
        Tag::Tagged,
        Tag::Closure,
    ];

    /// Decode a raw tag word.
    pub const fn from_raw(raw: u64) -> Result<Self, UnknownTag> {
        match raw {
            0xffff => Ok(Self::Int),
            0x1_0000 => Ok(Self::Double),
            0x1_0001 => Ok(Self::Str),
            0x1_0002 => Ok(Self::VectorInt),
            0x1_0003 => Ok(Self::Label),
            0x1_0004 => Ok(Self::Pair),
            0x1_0005 => Ok(Self::Tagged),
            0x1_0006 => Ok(Self::Closure),
            other => Err(UnknownTag(other)),
        }
    }

    /// Raw tag word.
    #[inline]
    pub const fn raw(self) -> u64 {
        self as u64
    }

    /// Whether objects of this kind may hold references to other objects.
    ///
    /// Leaf kinds are marked without being traced.
    #[inline]
    pub const fn has_references(self) -> bool {
        matches!(self, Self::Pair | Self::Tagged | Self::Closure)
    }

    /// Get the name of this tag as a static string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Str => "str",
            Self::VectorInt => "vector_int",
            Self::Label => "label",
            Self::Pair => "pair",
            Self::Tagged => "tagged",
            Self::Closure => "closure",
        }
    }
}

impl TryFrom<u64> for Tag {
    type Error = UnknownTag;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Tag::from_raw(raw)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag::{}", self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Tags must fit above the color byte of a header word.
const _: () = assert!(Tag::Closure.raw() <= u64::MAX >> 8);

#[cfg(test)]
mod tests;
