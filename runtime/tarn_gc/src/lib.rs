//! Tarn GC - stop-the-world mark-and-sweep collector.
//!
//! The [`Heap`] owns every object the machine allocates. Objects are kept on
//! an intrusive, index-linked list in allocation order (newest first); a
//! collection marks from an explicit [`Roots`] set with a FIFO worklist and
//! then walks the list once, releasing everything that was not reached.
//!
//! # Contents
//!
//! - [`Heap`]: slot arena, allocation, mark, sweep, threshold policy
//! - [`GcConfig`] / [`ThresholdPolicy`]: tuning knobs, loadable from the environment
//! - [`Roots`]: the root set handed to a collection
//! - [`Trace`] / [`Tracer`]: how an object reports its outgoing references
//! - [`SweepStats`] / [`GcStats`] / [`HeapStats`]: collection statistics

mod config;
mod error;
mod heap;
mod roots;
mod stats;
mod trace;

pub use config::{
    GcConfig, ThresholdPolicy, UnknownPolicy, BYTES_THRESHOLD_VAR, MAX_BYTES_VAR,
    OBJECTS_THRESHOLD_VAR, POLICY_VAR,
};
pub use error::GcError;
pub use heap::{Finalizer, Heap, Iter};
pub use roots::Roots;
pub use stats::{GcStats, HeapStats, SweepStats};
pub use trace::{Trace, Tracer};
