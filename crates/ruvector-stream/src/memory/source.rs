//! Memory counter sources

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Point-in-time memory counters in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsageSnapshot {
    /// Memory in active use
    pub heap_used: u64,
    /// Memory reserved by the process
    pub heap_total: u64,
    /// Memory held outside the accounted heap
    pub external: u64,
    /// Resident set size
    pub rss: u64,
}

/// Provider of memory counters
///
/// Implementations must be cheap and must not fail; unavailable counters are
/// reported as zero.
pub trait MemorySource: Send + Sync {
    /// Sample the current counters
    fn sample(&self) -> MemoryUsageSnapshot;
}

/// Reads counters of the current process through `sysinfo`
///
/// A native process has no managed heap, so `heap_used` reports the resident
/// set and `heap_total` the virtual size.
pub struct ProcessMemorySource {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl ProcessMemorySource {
    /// Create a source bound to the current process
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid().ok();
        if pid.is_none() {
            tracing::warn!("Current pid unavailable, memory counters will read as zero");
        }
        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }
}

impl Default for ProcessMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource for ProcessMemorySource {
    fn sample(&self) -> MemoryUsageSnapshot {
        let Some(pid) = self.pid else {
            return MemoryUsageSnapshot::default();
        };

        let mut system = self.system.lock();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), false);

        match system.process(pid) {
            Some(process) => {
                let rss = process.memory();
                MemoryUsageSnapshot {
                    heap_used: rss,
                    heap_total: process.virtual_memory(),
                    external: 0,
                    rss,
                }
            }
            None => MemoryUsageSnapshot::default(),
        }
    }
}

/// Counters set by the host
///
/// Useful when memory is accounted elsewhere (a tracking allocator, a cgroup
/// reader) and in tests.
#[derive(Debug, Default)]
pub struct ManualMemorySource {
    heap_used: AtomicU64,
    heap_total: AtomicU64,
    external: AtomicU64,
    rss: AtomicU64,
}

impl ManualMemorySource {
    /// Create a source reporting `heap_used` bytes
    pub fn new(heap_used: u64) -> Self {
        let source = Self::default();
        source.set_heap_used(heap_used);
        source
    }

    /// Create a source reporting `mb` megabytes of used heap
    pub fn with_heap_used_mb(mb: u64) -> Self {
        Self::new(mb * super::BYTES_PER_MB)
    }

    /// Update used heap bytes
    pub fn set_heap_used(&self, bytes: u64) {
        self.heap_used.store(bytes, Ordering::Release);
        self.heap_total.fetch_max(bytes, Ordering::AcqRel);
        self.rss.fetch_max(bytes, Ordering::AcqRel);
    }

    /// Update used heap in megabytes
    pub fn set_heap_used_mb(&self, mb: u64) {
        self.set_heap_used(mb * super::BYTES_PER_MB);
    }

    /// Update external bytes
    pub fn set_external(&self, bytes: u64) {
        self.external.store(bytes, Ordering::Release);
    }
}

impl MemorySource for ManualMemorySource {
    fn sample(&self) -> MemoryUsageSnapshot {
        MemoryUsageSnapshot {
            heap_used: self.heap_used.load(Ordering::Acquire),
            heap_total: self.heap_total.load(Ordering::Acquire),
            external: self.external.load(Ordering::Acquire),
            rss: self.rss.load(Ordering::Acquire),
        }
    }
}
