//! Reference tracing.

use smallvec::SmallVec;
use tarn_value::{Object, ValueRef};

/// Collects the references an object reports while it is being traced.
pub struct Tracer<'a> {
    found: &'a mut SmallVec<[ValueRef; 4]>,
}

impl<'a> Tracer<'a> {
    pub(crate) fn new(found: &'a mut SmallVec<[ValueRef; 4]>) -> Self {
        Tracer { found }
    }

    /// Report an outgoing reference. The heap decides whether it still
    /// needs to be visited.
    #[inline]
    pub fn mark(&mut self, target: ValueRef) {
        self.found.push(target);
    }
}

/// Anything that can hold references into the heap.
pub trait Trace {
    fn trace(&self, tracer: &mut Tracer<'_>);
}

impl Trace for Object {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for target in self.references() {
            tracer.mark(target);
        }
    }
}

impl Trace for ValueRef {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        tracer.mark(*self);
    }
}

impl<T: Trace> Trace for Option<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        if let Some(inner) = self {
            inner.trace(tracer);
        }
    }
}
