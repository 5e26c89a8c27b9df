//! # Lifecycle events emitted by a task.
//!
//! The [`EventKind`] enum names the six notifications a [`Task`](crate::Task) announces.
//! The [`Event`] struct carries the metadata: timestamp, task id, firing number, the
//! captured error and the remaining countdown at a pause.
//!
//! ## Ordering guarantees
//! For one task, events are published in the order
//! `start → (pause → resume)* → (result | error)* → end`, with `end` exactly once and last.
//! Each event also has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use countdown::{Event, EventKind, TaskError};
//!
//! let ev = Event::new(EventKind::Error, 7)
//!     .with_firing(2)
//!     .with_error(TaskError::Failed { error: "boom".into() });
//!
//! assert_eq!(ev.kind, EventKind::Error);
//! assert_eq!(ev.task, 7);
//! assert_eq!(ev.firing, Some(2));
//! assert_eq!("error".parse::<EventKind>().unwrap(), EventKind::Error);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::error::TaskError;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of task lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Task was armed by `run`.
    ///
    /// Sets:
    /// - `task`, `at`, `seq`
    Start,

    /// Task was paused; pending firing disarmed.
    ///
    /// Sets:
    /// - `remaining`: countdown left for the pending firing
    /// - `task`, `at`, `seq`
    Pause,

    /// Task was re-armed with the remaining countdown.
    ///
    /// Sets:
    /// - `remaining`: delay until the next firing
    /// - `task`, `at`, `seq`
    Resume,

    /// Callback completed successfully for one firing.
    ///
    /// Sets:
    /// - `firing`: firing number (1-based)
    /// - `task`, `at`, `seq`
    Result,

    /// Callback failed, or the configuration was rejected by `run`.
    ///
    /// Sets:
    /// - `error`: the captured failure
    /// - `firing`: firing number (callback failures only)
    /// - `task`, `at`, `seq`
    Error,

    /// Task finalized (exhausted or terminated). Always last, exactly once.
    ///
    /// Sets:
    /// - `firing`: number of firings that ran
    /// - `task`, `at`, `seq`
    End,
}

impl EventKind {
    /// All kinds, in lifecycle order.
    pub const ALL: [EventKind; 6] = [
        EventKind::Start,
        EventKind::Pause,
        EventKind::Resume,
        EventKind::Result,
        EventKind::Error,
        EventKind::End,
    ];

    /// Returns the event name used for subscribe-by-name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Pause => "pause",
            EventKind::Resume => "resume",
            EventKind::Result => "result",
            EventKind::Error => "error",
            EventKind::End => "end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TaskError::UnknownEvent { name: s.to_string() })
    }
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Id of the emitting task.
    pub task: u64,
    /// Event classification.
    pub kind: EventKind,
    /// Captured failure (`error` events only).
    pub error: Option<TaskError>,
    /// Firing number (starting from 1).
    pub firing: Option<u64>,
    /// Countdown left before the pending firing.
    pub remaining: Option<Duration>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind, task: u64) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            task,
            kind,
            error: None,
            firing: None,
            remaining: None,
        }
    }

    /// Attaches a captured error.
    #[inline]
    pub fn with_error(mut self, error: TaskError) -> Self {
        self.error = Some(error);
        self
    }

    /// Attaches a firing number.
    #[inline]
    pub fn with_firing(mut self, n: u64) -> Self {
        self.firing = Some(n);
        self
    }

    /// Attaches the remaining countdown.
    #[inline]
    pub fn with_remaining(mut self, d: Duration) -> Self {
        self.remaining = Some(d);
        self
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self.kind, EventKind::End)
    }
}
