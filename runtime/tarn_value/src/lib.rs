//! Tarn Value - heap object representation for the Tarn virtual machine.
//!
//! This crate is data-only. It defines what a heap object looks like; the
//! heap that owns objects lives in `tarn_gc`.
//!
//! # Contents
//!
//! - [`Tag`]: closed set of object kinds
//! - [`Color`] / [`Header`]: GC mark state packed with the tag into one word
//! - [`Object`]: variant payloads and their size accounting
//! - [`ValueRef`]: generation-checked handle to a heap object

mod header;
mod object;
mod tag;
mod value_ref;

pub use header::{Color, Header};
pub use object::{Object, HEADER_SIZE};
pub use tag::{Tag, UnknownTag, RESERVED_TAG};
pub use value_ref::{Label, ValueRef};
