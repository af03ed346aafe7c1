use tarn_gc::GcError;
use tarn_stack::StackError;
use thiserror::Error;

/// Error raised by machine operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    Gc(#[from] GcError),
    #[error(transparent)]
    Stack(#[from] StackError),
}
