//! Optional host hook for releasing memory between chunks

/// Best-effort memory release hint
///
/// Called periodically by the streaming processor. Implementations may trim
/// allocator arenas, flush caches, or do nothing.
pub trait GcHint: Send + Sync {
    fn collect(&self);
}

/// Hint that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGcHint;

impl GcHint for NoopGcHint {
    fn collect(&self) {}
}
