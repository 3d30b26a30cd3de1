//! Relief-check timer slot
//!
//! At most one relief task may run per controller. The slot moves through
//! `Idle -> Starting -> Active` and back to `Idle`: the first transition is a
//! compare-and-swap so concurrent starters cannot both win, and the handle is
//! installed under a lock that also serializes teardown.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::task::JoinHandle;

const IDLE: u8 = 0;
const STARTING: u8 = 1;
const ACTIVE: u8 = 2;

/// Lifecycle state of the relief-check timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReliefTimerState {
    /// No relief task
    Idle,
    /// A starter claimed the slot and is spawning the task
    Starting,
    /// A relief task is running
    Active,
}

impl ReliefTimerState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            STARTING => Self::Starting,
            ACTIVE => Self::Active,
            _ => Self::Idle,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    state: AtomicU8,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TimerSlot {
    pub(crate) fn state(&self) -> ReliefTimerState {
        ReliefTimerState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Spawn `task` unless a relief task is already starting or running.
    ///
    /// Returns true if this call installed the task.
    pub(crate) fn start<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self
            .state
            .compare_exchange(IDLE, STARTING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No Tokio runtime available, relief check not scheduled");
                let _ = self.state.compare_exchange(
                    STARTING,
                    IDLE,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                return false;
            }
        };

        let handle = runtime.spawn(task);

        let mut slot = self.handle.lock();
        // A stop() between our claim and here reset the state; the slot may
        // since have been claimed by another starter, which then owns it.
        if self
            .state
            .compare_exchange(STARTING, ACTIVE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            *slot = Some(handle);
            true
        } else {
            handle.abort();
            false
        }
    }

    /// Abort the running task, if any, and return to `Idle`.
    pub(crate) fn stop(&self) {
        let mut slot = self.handle.lock();
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        self.state.store(IDLE, Ordering::Release);
    }
}
