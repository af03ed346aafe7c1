//! Machine state and allocation entry points.

use tarn_gc::{Finalizer, GcConfig, GcStats, Heap, Roots, SweepStats};
use tarn_stack::{Stack, StackError};
use tarn_value::{Label, Object, ValueRef};

use crate::MachineError;

/// Operand stack slots reserved by [`Machine::new`].
pub const INITIAL_STACK_CAPACITY: usize = 8;

/// Heap, operand stack and environment of a running program.
///
/// The roots of every collection are exactly the environment, the live stack
/// slots and whatever the caller passes as an extra root. A handle that is in
/// none of those may be freed by the next allocation.
pub struct Machine {
    heap: Heap,
    stack: Stack<ValueRef>,
    env: Option<ValueRef>,
    /// Cleared by the interpreter loop to stop execution.
    pub is_running: bool,
    /// Instruction pointer.
    pub ip: Label,
}

impl Machine {
    pub fn new() -> Self {
        Self::with_config(GcConfig::default())
    }

    pub fn with_config(config: GcConfig) -> Self {
        tracing::debug!(
            objects_threshold = config.objects_threshold,
            bytes_threshold = config.bytes_threshold,
            max_bytes = config.max_bytes,
            policy = %config.policy,
            "machine initialized"
        );
        Machine {
            heap: Heap::with_config(config),
            stack: Stack::with_capacity(INITIAL_STACK_CAPACITY),
            env: None,
            is_running: true,
            ip: 0,
        }
    }

    /// Build a machine whose collector is configured from `TARN_GC_*`.
    pub fn from_env() -> Self {
        Self::with_config(GcConfig::from_env())
    }

    // -----------------------------------------------------------------------
    // Allocation
    // -----------------------------------------------------------------------

    /// Allocate `object`, collecting first if the heap asks for it.
    ///
    /// References held by `object` are treated as roots for that collection,
    /// so its operands do not need to be on the stack.
    ///
    /// # Panics
    ///
    /// Panics if `object` references a handle that is no longer live.
    pub fn allocate(
        &mut self,
        object: Object,
        finalizer: Option<Finalizer>,
    ) -> Result<ValueRef, MachineError> {
        let size = object.size();
        if self.heap.should_collect() || self.heap.would_exceed_limit(size) {
            tracing::debug!(
                objects = self.heap.objects_allocated(),
                bytes = self.heap.bytes_allocated(),
                "allocation triggered collection"
            );
            let roots = Roots::new(self.env, self.stack.as_slice())
                .extend_extra(object.references());
            self.heap.mark_sweep(&roots);
        }
        Ok(self.heap.allocate_sized(object, size, finalizer)?)
    }

    pub fn allocate_int(&mut self, value: i64) -> Result<ValueRef, MachineError> {
        self.allocate(Object::Int(value), None)
    }

    pub fn allocate_double(&mut self, value: f64) -> Result<ValueRef, MachineError> {
        self.allocate(Object::Double(value), None)
    }

    /// Allocate a byte string. The bytes are copied.
    pub fn allocate_string(&mut self, bytes: &[u8]) -> Result<ValueRef, MachineError> {
        self.allocate(Object::string(bytes), None)
    }

    /// Allocate an empty integer vector.
    pub fn allocate_vector_int(&mut self) -> Result<ValueRef, MachineError> {
        self.allocate_vector_int_from(Vec::new())
    }

    pub fn allocate_vector_int_from(&mut self, items: Vec<i64>) -> Result<ValueRef, MachineError> {
        self.allocate(Object::VectorInt(items), None)
    }

    pub fn allocate_pair(
        &mut self,
        lhs: Option<ValueRef>,
        rhs: Option<ValueRef>,
    ) -> Result<ValueRef, MachineError> {
        self.allocate(Object::Pair { lhs, rhs }, None)
    }

    pub fn allocate_tagged(
        &mut self,
        tag: u64,
        value: Option<ValueRef>,
    ) -> Result<ValueRef, MachineError> {
        self.allocate(Object::Tagged { tag, value }, None)
    }

    pub fn allocate_closure(
        &mut self,
        env: Option<ValueRef>,
        label: Label,
    ) -> Result<ValueRef, MachineError> {
        self.allocate(Object::Closure { env, label }, None)
    }

    pub fn allocate_label(&mut self, label: Label) -> Result<ValueRef, MachineError> {
        self.allocate(Object::Label(label), None)
    }

    // -----------------------------------------------------------------------
    // Collection
    // -----------------------------------------------------------------------

    /// Run a full collection rooted at the environment, the stack and `extra`.
    pub fn mark_sweep(&mut self, extra: Option<ValueRef>) -> GcStats {
        let roots = Roots::new(self.env, self.stack.as_slice()).extend_extra(extra);
        self.heap.mark_sweep(&roots)
    }

    /// The root set a collection would use right now.
    pub fn roots(&self) -> Roots<'_> {
        Roots::new(self.env, self.stack.as_slice())
    }

    /// Tear the machine down, running every outstanding finalizer.
    #[tracing::instrument(level = "debug", skip_all, fields(objects = self.heap.objects_allocated()))]
    pub fn free(mut self) -> SweepStats {
        self.release()
    }

    fn release(&mut self) -> SweepStats {
        self.env = None;
        self.stack.clear();
        self.is_running = false;
        let stats = self.heap.release_all();
        assert!(
            self.heap.is_empty(),
            "heap not empty after release: {:?}",
            self.heap
        );
        stats
    }

    // -----------------------------------------------------------------------
    // Stack and environment
    // -----------------------------------------------------------------------

    pub fn push(&mut self, value: ValueRef) -> Result<(), StackError> {
        self.stack.push(value)
    }

    pub fn pop(&mut self) -> Result<ValueRef, StackError> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Result<ValueRef, StackError> {
        self.stack.peek()
    }

    pub fn env(&self) -> Option<ValueRef> {
        self.env
    }

    pub fn set_env(&mut self, env: Option<ValueRef>) {
        self.env = env;
    }

    pub fn stack(&self) -> &Stack<ValueRef> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack<ValueRef> {
        &mut self.stack
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// # Panics
    ///
    /// Panics if `value` is stale.
    pub fn get(&self, value: ValueRef) -> &Object {
        self.heap.get(value)
    }

    /// # Panics
    ///
    /// Panics if `value` is stale.
    pub fn get_mut(&mut self, value: ValueRef) -> &mut Object {
        self.heap.get_mut(value)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Machine {
    fn drop(&mut self) {
        if !self.heap.is_empty() {
            self.release();
        }
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("heap", &self.heap)
            .field("stack", &self.stack)
            .field("env", &self.env)
            .field("is_running", &self.is_running)
            .field("ip", &self.ip)
            .finish()
    }
}
