//! Memory utilization relative to a configured ceiling

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::source::{MemorySource, MemoryUsageSnapshot, ProcessMemorySource};
use super::BYTES_PER_MB;

/// Ratio above which usage is reported as `Warning`
pub const WARNING_RATIO: f64 = 0.80;
/// Ratio above which usage is reported as `Critical`
pub const CRITICAL_RATIO: f64 = 0.90;

/// Memory status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryStatus {
    Normal,
    Warning,
    Critical,
}

impl MemoryStatus {
    /// Classify a usage ratio; both bounds are exclusive
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > CRITICAL_RATIO {
            Self::Critical
        } else if ratio > WARNING_RATIO {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-oriented view of a snapshot against the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub heap_used_mb: f64,
    pub heap_total_mb: f64,
    pub max_memory_mb: u64,
    /// Heap used as a percentage of the ceiling
    pub usage_percentage: f64,
    pub status: MemoryStatus,
}

/// Stateless reader of memory counters
///
/// Cloning is cheap and clones share the underlying source.
#[derive(Clone)]
pub struct MemoryMonitor {
    source: Arc<dyn MemorySource>,
    max_memory_mb: u64,
}

impl MemoryMonitor {
    /// Monitor the current process against `max_memory_mb`
    pub fn new(max_memory_mb: u64) -> Self {
        Self::with_source(max_memory_mb, Arc::new(ProcessMemorySource::new()))
    }

    /// Monitor an arbitrary counter source
    pub fn with_source(max_memory_mb: u64, source: Arc<dyn MemorySource>) -> Self {
        Self {
            source,
            max_memory_mb,
        }
    }

    /// Configured ceiling in MB
    pub fn max_memory_mb(&self) -> u64 {
        self.max_memory_mb
    }

    /// Current counters
    pub fn current_usage(&self) -> MemoryUsageSnapshot {
        self.source.sample()
    }

    /// Used heap divided by the ceiling
    pub fn usage_ratio(&self) -> f64 {
        self.ratio_of(&self.current_usage())
    }

    /// Usage is above 80% of the ceiling
    pub fn is_warning_level(&self) -> bool {
        self.usage_ratio() > WARNING_RATIO
    }

    /// Usage is above 90% of the ceiling
    pub fn is_critical_level(&self) -> bool {
        self.usage_ratio() > CRITICAL_RATIO
    }

    /// Snapshot, ratio and classification in one reading
    pub fn memory_report(&self) -> MemoryReport {
        let usage = self.current_usage();
        let ratio = self.ratio_of(&usage);

        MemoryReport {
            heap_used_mb: round2(usage.heap_used as f64 / BYTES_PER_MB as f64),
            heap_total_mb: round2(usage.heap_total as f64 / BYTES_PER_MB as f64),
            max_memory_mb: self.max_memory_mb,
            usage_percentage: round2(ratio * 100.0),
            status: MemoryStatus::from_ratio(ratio),
        }
    }

    fn ratio_of(&self, usage: &MemoryUsageSnapshot) -> f64 {
        let ceiling = self.max_memory_mb.saturating_mul(BYTES_PER_MB);
        if ceiling == 0 {
            return 0.0;
        }
        usage.heap_used as f64 / ceiling as f64
    }
}

impl std::fmt::Debug for MemoryMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryMonitor")
            .field("max_memory_mb", &self.max_memory_mb)
            .finish_non_exhaustive()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
