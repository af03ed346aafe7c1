//! Collection statistics.

use std::ops::AddAssign;
use std::time::Duration;

/// What a single sweep released.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SweepStats {
    pub objects_freed: u64,
    pub bytes_freed: u64,
    pub finalizers_run: u64,
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, other: Self) {
        self.objects_freed += other.objects_freed;
        self.bytes_freed += other.bytes_freed;
        self.finalizers_run += other.finalizers_run;
    }
}

/// Result of one full mark-and-sweep cycle.
#[derive(Copy, Clone, Debug, Default)]
pub struct GcStats {
    pub sweep: SweepStats,
    /// Objects reached from the root set.
    pub objects_marked: u64,
    pub duration: Duration,
}

/// Totals over the lifetime of a heap.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct HeapStats {
    /// Completed mark-and-sweep cycles.
    pub collections: u64,
    pub total_objects_freed: u64,
    pub total_bytes_freed: u64,
    /// High-water mark of `bytes_allocated`.
    pub peak_bytes: u64,
}
