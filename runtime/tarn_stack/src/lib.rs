//! Operand stack for the Tarn virtual machine.
//!
//! A dense, growable array of copyable slots. The stack owns no heap
//! objects itself: for the machine it holds `ValueRef` handles, and every
//! live slot (`0..len`) is a GC root.
//!
//! # Growth
//!
//! Capacity is managed explicitly: when a push finds the stack full, the
//! capacity doubles (first growth of an empty stack goes to 1). Growth uses
//! fallible reservation, so running out of memory surfaces as
//! [`StackError::GrowthFailed`] instead of aborting.

use std::slice;

use thiserror::Error;

/// Error raised by stack operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// `pop`/`peek` on an empty stack (or `peek_nth` past the bottom).
    #[error("stack underflow")]
    Underflow,
    /// The backing array could not be grown.
    #[error("stack growth to {requested} slots failed")]
    GrowthFailed { requested: usize },
}

/// Growable LIFO stack of `Copy` slots.
#[derive(Clone, Debug)]
pub struct Stack<T> {
    data: Vec<T>,
    /// Logical capacity; `data.len() <= capacity <= data.capacity()`.
    capacity: usize,
}

impl<T: Copy> Stack<T> {
    /// Create an empty stack with no backing storage.
    pub fn new() -> Self {
        Stack {
            data: Vec::new(),
            capacity: 0,
        }
    }

    /// Create an empty stack with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Stack {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a slot, growing the backing array if the stack is full.
    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        if self.data.len() == self.capacity {
            self.grow()?;
        }
        self.data.push(value);
        Ok(())
    }

    /// Remove and return the top slot.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.data.pop().ok_or(StackError::Underflow)
    }

    /// Return the top slot without removing it.
    pub fn peek(&self) -> Result<T, StackError> {
        self.data.last().copied().ok_or(StackError::Underflow)
    }

    /// Return the slot `depth` positions below the top (`0` is the top).
    pub fn peek_nth(&self, depth: usize) -> Result<T, StackError> {
        self.data
            .len()
            .checked_sub(depth)
            .and_then(|above| above.checked_sub(1))
            .map(|index| self.data[index])
            .ok_or(StackError::Underflow)
    }

    /// Drop every slot above `len`. No-op if the stack is already shorter.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Drop every slot, keeping the backing storage.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live slots, bottom first.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over live slots, bottom first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.data.iter()
    }

    fn grow(&mut self) -> Result<(), StackError> {
        let requested = if self.capacity == 0 {
            1
        } else {
            self.capacity
                .checked_mul(2)
                .ok_or(StackError::GrowthFailed {
                    requested: usize::MAX,
                })?
        };
        self.data
            .try_reserve_exact(requested - self.data.len())
            .map_err(|_| StackError::GrowthFailed { requested })?;
        tracing::trace!(from = self.capacity, to = requested, "stack grown");
        self.capacity = requested;
        Ok(())
    }
}

impl<T: Copy> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Copy> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
