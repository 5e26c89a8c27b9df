//! Mutable task state, guarded by the task's mutex.

use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use crate::config::Plan;
use crate::error::TaskError;
use crate::tasks::mode::Mode;
use crate::timer::TimerHandle;

/// Point in time captured on both clocks.
///
/// `at` is for display, `instant` for durations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stamp {
    pub at: SystemTime,
    pub instant: Instant,
}

impl Stamp {
    pub fn now() -> Self {
        Self {
            at: SystemTime::now(),
            instant: Instant::now(),
        }
    }
}

/// The currently armed timer.
#[derive(Debug)]
pub(crate) struct Armed {
    pub handle: TimerHandle,
    /// Arm generation; firings carrying another value are stale.
    pub generation: u64,
    /// Whether `handle` keeps firing on its own.
    pub repeating: bool,
    /// When the pending firing's countdown started.
    pub since: Instant,
}

#[derive(Debug)]
pub(crate) struct State {
    /// Set by the first successful `run`.
    pub plan: Option<Plan>,
    pub mode: Option<Mode>,
    pub remaining_countdown: Duration,
    /// Zero before the first `run` only when the configured count is invalid.
    pub remaining_executions: u64,
    /// Firings that reached the callback.
    pub firings: u64,
    /// The timer that delivers the pending firing, if one is set.
    pub armed: Option<Armed>,
    pub generation: u64,
    /// A firing's callback is running with the lock released.
    pub in_flight: bool,
    /// Arm requested while `in_flight`; performed once the callback returns.
    pub rearm_pending: bool,
    pub started: Option<Stamp>,
    pub ended: Option<Stamp>,
    pub paused: bool,
    pub finished: bool,
    pub errors: Vec<TaskError>,
}

impl State {
    pub fn new(countdown: Duration, executions: u64) -> Self {
        Self {
            plan: None,
            mode: None,
            remaining_countdown: countdown,
            remaining_executions: executions,
            firings: 0,
            armed: None,
            generation: 0,
            in_flight: false,
            rearm_pending: false,
            started: None,
            ended: None,
            paused: false,
            finished: false,
            errors: Vec::new(),
        }
    }

    /// True if a firing tagged with `generation` may still run.
    pub fn accepts(&self, generation: u64) -> bool {
        !self.paused
            && !self.finished
            && !self.in_flight
            && self
                .armed
                .as_ref()
                .is_some_and(|a| a.generation == generation)
    }

    /// Running, not paused, not finished: a timer is set or about to be.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some() || self.rearm_pending
    }

    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
