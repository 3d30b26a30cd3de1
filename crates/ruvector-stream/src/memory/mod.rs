//! Process memory monitoring

mod monitor;
mod source;

pub use monitor::{MemoryMonitor, MemoryReport, MemoryStatus, CRITICAL_RATIO, WARNING_RATIO};
pub use source::{ManualMemorySource, MemorySource, MemoryUsageSnapshot, ProcessMemorySource};

/// Bytes in one megabyte
pub const BYTES_PER_MB: u64 = 1_048_576;
