//! The collected heap.
//!
//! Objects live in a slot arena. Live slots are threaded into a singly
//! linked list through `Slot::next`, newest first, which is the order the
//! sweeper walks. Released slots go onto a free list and have their
//! generation bumped, so a [`ValueRef`] that outlived its object no longer
//! matches the slot it points at.
//!
//! # Collection
//!
//! Marking is iterative over a FIFO worklist. A handle is queued only while
//! its object is White (it turns Gray), and an object turns Black once its
//! references have been queued, so every reachable object is traced exactly
//! once per cycle and cycles terminate. Sweeping runs each dead object's
//! finalizer, unlinks it and returns its slot; survivors go back to White.

use std::collections::VecDeque;
use std::ops::Index;
use std::time::Instant;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tarn_value::{Color, Header, Object, ValueRef};

use crate::config::{GcConfig, ThresholdPolicy};
use crate::error::GcError;
use crate::roots::Roots;
use crate::stats::{GcStats, HeapStats, SweepStats};
use crate::trace::{Trace, Tracer};

/// Cleanup hook run once, just before its object's storage is released.
pub type Finalizer = Box<dyn FnOnce(ValueRef, &Object)>;

struct Slot {
    header: Header,
    /// Next older live object.
    next: Option<ValueRef>,
    /// Bytes charged for this object.
    size: u64,
    generation: u32,
    /// `None` while the slot is on the free list.
    object: Option<Object>,
}

/// Mark-and-sweep heap.
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Most recently allocated live object.
    head: Option<ValueRef>,
    bytes_allocated: u64,
    objects_allocated: u64,
    objects_threshold: u64,
    bytes_threshold: u64,
    finalizers: FxHashMap<ValueRef, Finalizer>,
    config: GcConfig,
    stats: HeapStats,
}

impl Heap {
    pub fn new() -> Self {
        Self::with_config(GcConfig::default())
    }

    pub fn with_config(config: GcConfig) -> Self {
        Heap {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            bytes_allocated: 0,
            objects_allocated: 0,
            objects_threshold: config.objects_threshold.max(1),
            bytes_threshold: config.bytes_threshold.max(1),
            finalizers: FxHashMap::default(),
            config,
            stats: HeapStats::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Allocation
    // -----------------------------------------------------------------------

    /// Link `object` into the heap, charging [`Object::size`] bytes.
    ///
    /// Never collects; callers decide when to run [`Heap::mark_sweep`]
    /// (see [`Heap::should_collect`]).
    pub fn allocate(
        &mut self,
        object: Object,
        finalizer: Option<Finalizer>,
    ) -> Result<ValueRef, GcError> {
        let size = object.size();
        self.allocate_sized(object, size, finalizer)
    }

    /// Link `object` into the heap, charging exactly `size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `object` references a handle that is no longer live.
    pub fn allocate_sized(
        &mut self,
        object: Object,
        size: u64,
        finalizer: Option<Finalizer>,
    ) -> Result<ValueRef, GcError> {
        for target in object.references() {
            self.assert_live(target);
        }
        if self.would_exceed_limit(size) {
            return Err(self.out_of_memory(size));
        }

        let tag = object.tag();
        let header = Header::new(tag, Color::White);
        let next = self.head;

        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.header = header;
            slot.next = next;
            slot.size = size;
            slot.object = Some(object);
            ValueRef::new(index, slot.generation)
        } else {
            let index =
                u32::try_from(self.slots.len()).map_err(|_| self.out_of_memory(size))?;
            self.slots
                .try_reserve(1)
                .map_err(|_| self.out_of_memory(size))?;
            self.slots.push(Slot {
                header,
                next,
                size,
                generation: 0,
                object: Some(object),
            });
            ValueRef::new(index, 0)
        };

        self.head = Some(handle);
        self.bytes_allocated += size;
        self.objects_allocated += 1;
        self.stats.peak_bytes = self.stats.peak_bytes.max(self.bytes_allocated);
        if let Some(finalizer) = finalizer {
            self.finalizers.insert(handle, finalizer);
        }

        tracing::trace!(?handle, %tag, size, "allocated");
        Ok(handle)
    }

    /// Whether the next allocation should be preceded by a collection.
    #[inline]
    pub fn should_collect(&self) -> bool {
        self.objects_allocated >= self.objects_threshold
            || self.bytes_allocated >= self.bytes_threshold
    }

    /// Whether charging `size` more bytes would break the configured limit.
    #[inline]
    pub fn would_exceed_limit(&self, size: u64) -> bool {
        let limit = self.config.max_bytes;
        limit != 0 && self.bytes_allocated.saturating_add(size) > limit
    }

    fn out_of_memory(&self, requested: u64) -> GcError {
        GcError::OutOfMemory {
            requested,
            allocated: self.bytes_allocated,
            limit: self.config.max_bytes,
        }
    }

    // -----------------------------------------------------------------------
    // Collection
    // -----------------------------------------------------------------------

    /// Run a full cycle: mark from `roots`, sweep, then adjust thresholds.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(objects = self.objects_allocated, bytes = self.bytes_allocated, roots = roots.len())
    )]
    pub fn mark_sweep(&mut self, roots: &Roots<'_>) -> GcStats {
        let start = Instant::now();
        let objects_marked = self.mark(roots);
        let sweep = self.sweep();
        self.adjust_thresholds();
        self.stats.collections += 1;

        let stats = GcStats {
            sweep,
            objects_marked,
            duration: start.elapsed(),
        };
        tracing::debug!(
            marked = objects_marked,
            freed = sweep.objects_freed,
            bytes_freed = sweep.bytes_freed,
            finalizers = sweep.finalizers_run,
            objects_threshold = self.objects_threshold,
            bytes_threshold = self.bytes_threshold,
            "collection finished"
        );
        stats
    }

    /// Mark everything reachable from `roots`. Returns the number of
    /// objects reached.
    ///
    /// # Panics
    ///
    /// Panics if a root or a stored reference is stale.
    pub fn mark(&mut self, roots: &Roots<'_>) -> u64 {
        let mut worklist = VecDeque::new();
        for root in roots.iter() {
            self.shade(root, &mut worklist);
        }

        let mut found = SmallVec::new();
        let mut marked = 0;
        while let Some(handle) = worklist.pop_front() {
            let slot = self.live_slot_mut(handle);
            let tag = slot.header.tag();
            slot.header.set_color(Color::Black);
            marked += 1;

            if !tag.has_references() {
                continue;
            }
            if let Some(object) = &slot.object {
                debug_assert_eq!(object.tag(), tag);
                object.trace(&mut Tracer::new(&mut found));
            }
            for child in found.drain(..) {
                self.shade(child, &mut worklist);
            }
        }
        marked
    }

    /// Queue `handle` if it has not been reached yet this cycle.
    fn shade(&mut self, handle: ValueRef, worklist: &mut VecDeque<ValueRef>) {
        let slot = self.live_slot_mut(handle);
        if slot.header.color() == Color::White {
            slot.header.set_color(Color::Gray);
            worklist.push_back(handle);
        }
    }

    /// Release every object that is not Black and reset survivors to White.
    pub fn sweep(&mut self) -> SweepStats {
        let mut stats = SweepStats::default();
        let mut prev: Option<ValueRef> = None;
        let mut cursor = self.head;

        while let Some(handle) = cursor {
            let slot = &mut self.slots[handle.index()];
            let next = slot.next;
            if slot.header.color() == Color::Black {
                slot.header.set_color(Color::White);
                prev = Some(handle);
            } else {
                match prev {
                    Some(prev) => self.slots[prev.index()].next = next,
                    None => self.head = next,
                }
                stats += self.release(handle);
            }
            cursor = next;
        }

        self.stats.total_objects_freed += stats.objects_freed;
        self.stats.total_bytes_freed += stats.bytes_freed;
        stats
    }

    /// Free every object, running all outstanding finalizers.
    pub fn release_all(&mut self) -> SweepStats {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let slot = &mut self.slots[handle.index()];
            slot.header.set_color(Color::White);
            cursor = slot.next;
        }
        let stats = self.sweep();
        debug_assert!(self.head.is_none());
        stats
    }

    /// Return an unlinked slot to the free list.
    fn release(&mut self, handle: ValueRef) -> SweepStats {
        let slot = &mut self.slots[handle.index()];
        let object = slot.object.take();
        let size = slot.size;
        slot.next = None;
        slot.size = 0;
        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(handle.raw_index());
        self.bytes_allocated -= size;
        self.objects_allocated -= 1;

        let mut finalizers_run = 0;
        if let Some(finalizer) = self.finalizers.remove(&handle) {
            if let Some(object) = &object {
                finalizer(handle, object);
                finalizers_run = 1;
            }
        }
        SweepStats {
            objects_freed: 1,
            bytes_freed: size,
            finalizers_run,
        }
    }

    fn adjust_thresholds(&mut self) {
        if self.config.policy == ThresholdPolicy::Static {
            return;
        }
        if self.objects_allocated.saturating_mul(2) > self.objects_threshold {
            self.objects_threshold = self.objects_threshold.saturating_mul(2);
            tracing::debug!(threshold = self.objects_threshold, "objects threshold raised");
        }
        if self.bytes_allocated.saturating_mul(2) > self.bytes_threshold {
            self.bytes_threshold = self.bytes_threshold.saturating_mul(2);
            tracing::debug!(threshold = self.bytes_threshold, "bytes threshold raised");
        }
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    fn live_slot(&self, handle: ValueRef) -> Option<&Slot> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation() && slot.object.is_some())
    }

    fn live_slot_mut(&mut self, handle: ValueRef) -> &mut Slot {
        match self.slots.get_mut(handle.index()) {
            Some(slot) if slot.generation == handle.generation() && slot.object.is_some() => slot,
            _ => panic!("stale ValueRef: {handle:?}"),
        }
    }

    fn assert_live(&self, handle: ValueRef) {
        if !self.contains(handle) {
            panic!("stale ValueRef: {handle:?}");
        }
    }

    /// Whether `handle` still refers to a live object.
    pub fn contains(&self, handle: ValueRef) -> bool {
        self.live_slot(handle).is_some()
    }

    pub fn try_get(&self, handle: ValueRef) -> Option<&Object> {
        self.live_slot(handle).and_then(|slot| slot.object.as_ref())
    }

    /// # Panics
    ///
    /// Panics if `handle` is stale.
    pub fn get(&self, handle: ValueRef) -> &Object {
        self.try_get(handle)
            .unwrap_or_else(|| panic!("stale ValueRef: {handle:?}"))
    }

    /// Stores made through the returned object are not checked for stale
    /// handles; [`Heap::set_lhs`] and friends are.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is stale.
    pub fn get_mut(&mut self, handle: ValueRef) -> &mut Object {
        match self.live_slot_mut(handle).object.as_mut() {
            Some(object) => object,
            None => panic!("stale ValueRef: {handle:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Reference stores
    // -----------------------------------------------------------------------

    /// Store `value` as the left half of the pair at `target`.
    /// Returns `false` if `target` is not a pair.
    ///
    /// # Panics
    ///
    /// Panics if `target` or `value` is stale.
    pub fn set_lhs(&mut self, target: ValueRef, value: Option<ValueRef>) -> bool {
        self.store(target, value, Object::set_lhs)
    }

    /// Store `value` as the right half of the pair at `target`.
    pub fn set_rhs(&mut self, target: ValueRef, value: Option<ValueRef>) -> bool {
        self.store(target, value, Object::set_rhs)
    }

    /// Replace the payload of the tagged value at `target`.
    pub fn set_tagged_value(&mut self, target: ValueRef, value: Option<ValueRef>) -> bool {
        self.store(target, value, Object::set_tagged_value)
    }

    /// Replace the captured environment of the closure at `target`.
    pub fn set_closure_env(&mut self, target: ValueRef, env: Option<ValueRef>) -> bool {
        self.store(target, env, Object::set_closure_env)
    }

    fn store(
        &mut self,
        target: ValueRef,
        value: Option<ValueRef>,
        set: impl FnOnce(&mut Object, Option<ValueRef>) -> bool,
    ) -> bool {
        if let Some(value) = value {
            self.assert_live(value);
        }
        set(self.get_mut(target), value)
    }

    pub fn header(&self, handle: ValueRef) -> Header {
        match self.live_slot(handle) {
            Some(slot) => slot.header,
            None => panic!("stale ValueRef: {handle:?}"),
        }
    }

    pub fn color(&self, handle: ValueRef) -> Color {
        self.header(handle).color()
    }

    /// Live objects, newest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            heap: self,
            cursor: self.head,
        }
    }

    /// Most recently allocated live object.
    pub fn head(&self) -> Option<ValueRef> {
        self.head
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        usize::try_from(self.objects_allocated).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn bytes_allocated(&self) -> u64 {
        self.bytes_allocated
    }

    pub fn objects_allocated(&self) -> u64 {
        self.objects_allocated
    }

    pub fn objects_threshold(&self) -> u64 {
        self.objects_threshold
    }

    pub fn bytes_threshold(&self) -> u64 {
        self.bytes_threshold
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        if !self.finalizers.is_empty() {
            self.release_all();
        }
    }
}

impl Index<ValueRef> for Heap {
    type Output = Object;

    fn index(&self, handle: ValueRef) -> &Object {
        self.get(handle)
    }
}

impl std::fmt::Debug for Heap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heap")
            .field("objects_allocated", &self.objects_allocated)
            .field("bytes_allocated", &self.bytes_allocated)
            .field("objects_threshold", &self.objects_threshold)
            .field("bytes_threshold", &self.bytes_threshold)
            .field("finalizers", &self.finalizers.len())
            .finish_non_exhaustive()
    }
}

/// Iterator over live objects in list order (newest first).
pub struct Iter<'a> {
    heap: &'a Heap,
    cursor: Option<ValueRef>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (ValueRef, &'a Object);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let slot = &self.heap.slots[handle.index()];
        self.cursor = slot.next;
        slot.object.as_ref().map(|object| (handle, object))
    }
}

impl<'a> IntoIterator for &'a Heap {
    type Item = (ValueRef, &'a Object);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
