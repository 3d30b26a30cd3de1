//! Backpressure: bounded buffer with pause/resume admission control

mod controller;
mod timer;

pub use controller::{BackpressureController, BackpressureStatus};
pub use timer::ReliefTimerState;
