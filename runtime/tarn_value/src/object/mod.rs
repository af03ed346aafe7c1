//! Object payloads.
//!
//! An `Object` is the variant-dependent part of a heap object. The heap
//! stores it next to the header word, the list link and the size word; the
//! accounting in [`Object::size`] charges for all four.

use std::mem::size_of;

use crate::tag::Tag;
use crate::value_ref::{Label, ValueRef};

/// Bytes charged for the fixed part of every object: header word, list
/// link, size word.
pub const HEADER_SIZE: u64 = 24;

const WORD: u64 = 8;
const VEC_SIZE: u64 = size_of::<Vec<i64>>() as u64;

/// Variant payload of a heap object.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Int(i64),
    Double(f64),
    /// Raw bytes; not required to be UTF-8.
    Str(Box<[u8]>),
    VectorInt(Vec<i64>),
    Label(Label),
    Pair {
        lhs: Option<ValueRef>,
        rhs: Option<ValueRef>,
    },
    /// Tagged-union value: a user-level discriminant plus its payload.
    Tagged {
        tag: u64,
        value: Option<ValueRef>,
    },
    /// Captured environment plus entry point.
    Closure {
        env: Option<ValueRef>,
        label: Label,
    },
}

impl Object {
    /// Build a string object from raw bytes.
    pub fn string(bytes: &[u8]) -> Self {
        Object::Str(bytes.into())
    }

    /// The tag stored in this object's header.
    pub const fn tag(&self) -> Tag {
        match self {
            Object::Int(_) => Tag::Int,
            Object::Double(_) => Tag::Double,
            Object::Str(_) => Tag::Str,
            Object::VectorInt(_) => Tag::VectorInt,
            Object::Label(_) => Tag::Label,
            Object::Pair { .. } => Tag::Pair,
            Object::Tagged { .. } => Tag::Tagged,
            Object::Closure { .. } => Tag::Closure,
        }
    }

    /// Bytes charged to the heap when this object is allocated.
    ///
    /// Strings are charged a length word plus their bytes. Vectors are
    /// charged for their fixed handle only; elements pushed later are not
    /// re-accounted.
    pub fn size(&self) -> u64 {
        let payload = match self {
            Object::Int(_) | Object::Double(_) | Object::Label(_) => WORD,
            Object::Str(bytes) => WORD + bytes.len() as u64,
            Object::VectorInt(_) => VEC_SIZE,
            Object::Pair { .. } | Object::Tagged { .. } | Object::Closure { .. } => 2 * WORD,
        };
        HEADER_SIZE + payload
    }

    /// Outgoing references, in field order.
    pub fn references(&self) -> impl Iterator<Item = ValueRef> {
        let (first, second) = match *self {
            Object::Pair { lhs, rhs } => (lhs, rhs),
            Object::Tagged { value, .. } => (value, None),
            Object::Closure { env, .. } => (env, None),
            Object::Int(_)
            | Object::Double(_)
            | Object::Str(_)
            | Object::VectorInt(_)
            | Object::Label(_) => (None, None),
        };
        first.into_iter().chain(second)
    }

    // -----------------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------------

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Object::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Object::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str_bytes(&self) -> Option<&[u8]> {
        match self {
            Object::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// String contents, if this is a string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_str_bytes()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn as_vector_int(&self) -> Option<&[i64]> {
        match self {
            Object::VectorInt(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_vector_int_mut(&mut self) -> Option<&mut Vec<i64>> {
        match self {
            Object::VectorInt(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<Label> {
        match self {
            Object::Label(label) => Some(*label),
            _ => None,
        }
    }

    /// `(lhs, rhs)` of a pair.
    pub fn as_pair(&self) -> Option<(Option<ValueRef>, Option<ValueRef>)> {
        match self {
            Object::Pair { lhs, rhs } => Some((*lhs, *rhs)),
            _ => None,
        }
    }

    /// `(tag, value)` of a tagged union.
    pub fn as_tagged(&self) -> Option<(u64, Option<ValueRef>)> {
        match self {
            Object::Tagged { tag, value } => Some((*tag, *value)),
            _ => None,
        }
    }

    /// `(env, label)` of a closure.
    pub fn as_closure(&self) -> Option<(Option<ValueRef>, Label)> {
        match self {
            Object::Closure { env, label } => Some((*env, *label)),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Reference setters
    // -----------------------------------------------------------------------

    /// Returns `false` if this is not a pair.
    pub fn set_lhs(&mut self, value: Option<ValueRef>) -> bool {
        match self {
            Object::Pair { lhs, .. } => {
                *lhs = value;
                true
            }
            _ => false,
        }
    }

    /// Returns `false` if this is not a pair.
    pub fn set_rhs(&mut self, value: Option<ValueRef>) -> bool {
        match self {
            Object::Pair { rhs, .. } => {
                *rhs = value;
                true
            }
            _ => false,
        }
    }

    /// Returns `false` if this is not a tagged union.
    pub fn set_tagged_value(&mut self, new_value: Option<ValueRef>) -> bool {
        match self {
            Object::Tagged { value, .. } => {
                *value = new_value;
                true
            }
            _ => false,
        }
    }

    /// Returns `false` if this is not a closure.
    pub fn set_closure_env(&mut self, new_env: Option<ValueRef>) -> bool {
        match self {
            Object::Closure { env, .. } => {
                *env = new_env;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
