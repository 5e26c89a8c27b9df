//! # Timer primitive consumed by tasks.
//!
//! A [`Task`](crate::Task) never sleeps itself. It asks a [`Timer`] to call a `fire`
//! closure later and keeps the returned [`TimerHandle`] so it can disarm it.
//!
//! - [`Timer::arm_once`] fires once after a delay (`0` = next scheduling quantum);
//! - [`Timer::arm_repeating`] fires every interval until cancelled;
//! - [`Timer::cancel`] prevents future firings (best-effort, idempotent).
//!
//! The default implementation is [`TokioTimer`].
//!
//! ## Contract
//! - `fire` must **not** be invoked from inside `arm_*` (the task holds its state lock there).
//! - Firings for one handle are delivered one at a time.
//! - Cancelling an already-fired or already-cancelled handle is a no-op.

mod handle;
mod tokio_timer;

use std::sync::Arc;
use std::time::Duration;

pub use handle::TimerHandle;
pub use tokio_timer::TokioTimer;

use crate::error::TaskError;

/// Closure invoked on each firing.
pub type Fire = Arc<dyn Fn() + Send + Sync + 'static>;

/// Something that can call a closure later, and be told not to.
pub trait Timer: Send + Sync + 'static {
    /// Invokes `fire` once after `delay` has elapsed.
    fn arm_once(&self, delay: Duration, fire: Fire) -> Result<TimerHandle, TaskError>;

    /// Invokes `fire` every `interval` until the handle is cancelled.
    fn arm_repeating(&self, interval: Duration, fire: Fire) -> Result<TimerHandle, TaskError>;

    /// Prevents future firings for `handle`.
    fn cancel(&self, handle: TimerHandle) {
        handle.cancel();
    }
}
