//! Admission control over a bounded FIFO buffer
//!
//! Two independent pressure signals gate admission:
//!
//! - buffer fullness: `len >= max_buffer_size`
//! - memory: `ratio > pause_threshold`
//!
//! Either one pauses admission. Resuming requires both to have cleared with
//! margin (`ratio < resume_threshold` and buffer below half capacity), which
//! keeps the controller from flapping around a single boundary.
//!
//! ```text
//!            should_apply_backpressure()
//!   NORMAL ------------------------------> PAUSED
//!     ^                                      |
//!     |        relief check: can_resume()    |
//!     +--------------------------------------+
//! ```

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

use super::timer::{ReliefTimerState, TimerSlot};
use crate::config::BackpressureConfig;
use crate::error::Result;
use crate::memory::{MemoryMonitor, MemoryReport};

/// Point-in-time view of a controller
#[derive(Debug, Clone, Serialize)]
pub struct BackpressureStatus {
    pub is_paused: bool,
    pub buffer_size: usize,
    pub max_buffer_size: usize,
    pub memory: MemoryReport,
    pub should_apply_backpressure: bool,
}

/// Backpressure controller owning a bounded buffer of `T`
///
/// Intended for one producer and one consumer. Dropping the controller closes
/// it: the relief task is cancelled and any suspended callers resume.
pub struct BackpressureController<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    config: BackpressureConfig,
    monitor: MemoryMonitor,
    buffer: Mutex<VecDeque<T>>,
    waiters: Mutex<VecDeque<oneshot::Sender<()>>>,
    paused: AtomicBool,
    closed: AtomicBool,
    timer: TimerSlot,
}

impl<T: Send + 'static> BackpressureController<T> {
    /// Create a controller in the `NORMAL` state.
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: BackpressureConfig, monitor: MemoryMonitor) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                buffer: Mutex::new(VecDeque::with_capacity(config.max_buffer_size.min(1024))),
                config,
                monitor,
                waiters: Mutex::new(VecDeque::new()),
                paused: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                timer: TimerSlot::default(),
            }),
        })
    }

    pub fn config(&self) -> &BackpressureConfig {
        &self.inner.config
    }

    pub fn monitor(&self) -> &MemoryMonitor {
        &self.inner.monitor
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn buffer_len(&self) -> usize {
        self.inner.buffer_len()
    }

    /// Number of callers suspended in `wait_for_relief`
    pub fn waiter_count(&self) -> usize {
        self.inner.waiters.lock().len()
    }

    pub fn relief_timer_state(&self) -> ReliefTimerState {
        self.inner.timer.state()
    }

    pub fn is_relief_check_active(&self) -> bool {
        self.relief_timer_state() != ReliefTimerState::Idle
    }

    /// Buffer has reached `max_buffer_size`
    pub fn is_buffer_full(&self) -> bool {
        self.inner.is_buffer_full()
    }

    /// Memory ratio is above the pause threshold
    pub fn is_memory_over_pressure(&self) -> bool {
        self.inner.is_memory_over_pressure()
    }

    /// Either pressure signal is raised
    pub fn should_apply_backpressure(&self) -> bool {
        self.inner.should_apply_backpressure()
    }

    /// Memory is below the resume threshold and the buffer is under half full
    pub fn can_resume(&self) -> bool {
        self.inner.can_resume()
    }

    /// Suspend until admission is allowed.
    ///
    /// Completes without suspending when no pressure signal is raised.
    /// Otherwise the caller is queued behind earlier waiters and a relief
    /// check is scheduled if none is running. Outside a Tokio runtime no
    /// relief check can run, so the caller is admitted without waiting.
    pub async fn wait_for_relief(&self) {
        if !self.should_apply_backpressure() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!(
                buffer_size = self.buffer_len(),
                "No Tokio runtime available, admitting without backpressure"
            );
            return;
        }

        let receiver = {
            let mut waiters = self.inner.waiters.lock();
            if self.is_closed() {
                return;
            }

            self.inner.paused.store(true, Ordering::Release);
            let memory = self.inner.monitor.memory_report();
            tracing::warn!(
                buffer_size = self.buffer_len(),
                max_buffer_size = self.inner.config.max_buffer_size,
                memory_percent = memory.usage_percentage,
                memory_status = %memory.status,
                waiters = waiters.len() + 1,
                "Backpressure applied"
            );

            let (sender, receiver) = oneshot::channel();
            waiters.push_back(sender);
            receiver
        };

        self.start_relief_check();

        // An error means the controller was torn down, which also releases us
        let _ = receiver.await;
    }

    /// Schedule the periodic resume check.
    ///
    /// Returns true if this call installed the timer; false if one was
    /// already starting or active, or the controller is closed.
    pub fn start_relief_check(&self) -> bool {
        if self.is_closed() {
            return false;
        }
        let weak = Arc::downgrade(&self.inner);
        let interval = self.inner.config.check_interval;
        self.inner.timer.start(relief_loop(weak, interval))
    }

    /// Leave the `PAUSED` state and release every waiter in admission order.
    ///
    /// Idempotent.
    pub fn relieve_backpressure(&self) {
        self.inner.relieve();
    }

    /// Wait for relief, then append `item` to the buffer tail
    pub async fn add_to_buffer(&self, item: T) {
        self.wait_for_relief().await;
        self.inner.buffer.lock().push_back(item);
    }

    /// Remove up to `count` items from the buffer head, oldest first
    pub fn remove_from_buffer(&self, count: usize) -> Vec<T> {
        let mut buffer = self.inner.buffer.lock();
        let take = count.min(buffer.len());
        buffer.drain(..take).collect()
    }

    /// Remove everything currently buffered
    pub fn drain_buffer(&self) -> Vec<T> {
        self.inner.buffer.lock().drain(..).collect()
    }

    pub fn status(&self) -> BackpressureStatus {
        BackpressureStatus {
            is_paused: self.is_paused(),
            buffer_size: self.buffer_len(),
            max_buffer_size: self.inner.config.max_buffer_size,
            memory: self.inner.monitor.memory_report(),
            should_apply_backpressure: self.should_apply_backpressure(),
        }
    }

    /// Cancel the relief timer, release all waiters and discard buffered items.
    ///
    /// Admission is no longer gated afterwards. Idempotent; also runs on drop.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl<T> Drop for BackpressureController<T> {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl<T> std::fmt::Debug for BackpressureController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackpressureController")
            .field("config", &self.inner.config)
            .field("buffer_size", &self.inner.buffer_len())
            .field("paused", &self.inner.paused.load(Ordering::Acquire))
            .field("timer", &self.inner.timer.state())
            .finish()
    }
}

impl<T> Inner<T> {
    fn buffer_len(&self) -> usize {
        self.buffer.lock().len()
    }

    fn is_buffer_full(&self) -> bool {
        self.buffer_len() >= self.config.max_buffer_size
    }

    fn is_memory_over_pressure(&self) -> bool {
        self.monitor.usage_ratio() > self.config.pause_threshold
    }

    fn should_apply_backpressure(&self) -> bool {
        !self.is_closed() && (self.is_memory_over_pressure() || self.is_buffer_full())
    }

    fn can_resume(&self) -> bool {
        let memory_relieved = self.monitor.usage_ratio() < self.config.resume_threshold;
        let buffer_drained = self.buffer_len() * 2 < self.config.max_buffer_size;
        memory_relieved && buffer_drained
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn relieve(&self) {
        self.timer.stop();
        let was_paused = self.paused.swap(false, Ordering::AcqRel);

        let released: Vec<_> = self.waiters.lock().drain(..).collect();
        let count = released.len();
        for waiter in released {
            let _ = waiter.send(());
        }

        if was_paused || count > 0 {
            tracing::info!(
                buffer_size = self.buffer_len(),
                memory_percent = self.monitor.memory_report().usage_percentage,
                released_waiters = count,
                "Backpressure relieved"
            );
        }
    }

    fn close(&self) {
        let released: Vec<_> = {
            let mut waiters = self.waiters.lock();
            if self.closed.swap(true, Ordering::AcqRel) {
                return;
            }
            waiters.drain(..).collect()
        };

        self.timer.stop();
        self.paused.store(false, Ordering::Release);
        for waiter in released {
            let _ = waiter.send(());
        }

        let discarded = {
            let mut buffer = self.buffer.lock();
            let len = buffer.len();
            buffer.clear();
            len
        };
        tracing::debug!(discarded, "Backpressure controller closed");
    }
}

/// Periodic resume check. Holds only a weak reference so it never keeps the
/// controller alive; exits once relief happens or the controller is gone.
async fn relief_loop<T>(inner: Weak<Inner<T>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let Some(inner) = inner.upgrade() else {
            break;
        };
        if inner.is_closed() {
            break;
        }
        if inner.can_resume() {
            inner.relieve();
            break;
        }

        tracing::debug!(
            buffer_size = inner.buffer_len(),
            memory_ratio = inner.monitor.usage_ratio(),
            "Backpressure still engaged"
        );
    }
}
