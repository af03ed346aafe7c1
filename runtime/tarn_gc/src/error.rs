use thiserror::Error;

/// Error raised by heap allocation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GcError {
    /// The allocation would exceed the configured heap limit, or the slot
    /// arena could not grow. `limit` is 0 when no limit is configured.
    #[error(
        "out of memory: requested {requested} bytes with {allocated} bytes allocated (limit {limit})"
    )]
    OutOfMemory {
        requested: u64,
        allocated: u64,
        limit: u64,
    },
}
