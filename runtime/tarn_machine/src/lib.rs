//! Tarn Machine - the state an interpreter loop runs against.
//!
//! A [`Machine`] owns the garbage-collected heap, the operand stack and the
//! current environment. It is the only place that knows what the roots
//! are, so every allocation goes through it: when the heap asks for a
//! collection, the machine runs one rooted at the environment, the stack and
//! the operands of the object being allocated.
//!
//! # Tracing
//!
//! Collections and allocations are instrumented with `tracing`. Call
//! [`init_tracing`] once at startup and set `RUST_LOG`, for example
//! `RUST_LOG=tarn_gc=debug` for per-cycle summaries or
//! `RUST_LOG=tarn_gc=trace,tarn_stack=trace` for every allocation.

use std::sync::Once;

mod error;
mod machine;

pub use error::MachineError;
pub use machine::{Machine, INITIAL_STACK_CAPACITY};

pub use tarn_gc::{
    Finalizer, GcConfig, GcError, GcStats, Heap, HeapStats, Roots, SweepStats, ThresholdPolicy,
};
pub use tarn_stack::StackError;
pub use tarn_value::{Label, Object, Tag, ValueRef};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber from `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
