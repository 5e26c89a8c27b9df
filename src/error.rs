//! Error types used by countdown tasks.
//!
//! [`TaskError`] covers three groups:
//!
//! - **configuration**: invalid countdown or execution count, detected by [`Task::run`](crate::Task::run);
//! - **callback failure**: the user callback returned `Err` or panicked during a firing;
//! - **runtime**: the timer primitive could not arm, or the task is already finished.
//!
//! Callback failures never abort a task. They are appended to the task's error list and
//! reported through the `error` event, then completion accounting continues as usual.

use thiserror::Error;

/// # Errors produced by a countdown task.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Configured countdown is negative.
    #[error("invalid countdown {countdown_ms}ms: must be >= 0")]
    InvalidCountdown {
        /// The rejected countdown in milliseconds.
        countdown_ms: i64,
    },

    /// Configured execution count is zero or negative.
    #[error("invalid executions {executions}: must be >= 1")]
    InvalidExecutions {
        /// The rejected execution count.
        executions: i64,
    },

    /// Callback returned an error for this firing.
    #[error("callback failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Callback panicked during this firing.
    #[error("callback panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// The timer primitive or the async runtime could not schedule work.
    #[error("runtime unavailable: {reason}")]
    Runtime {
        /// Why scheduling failed.
        reason: String,
    },

    /// Operation requires a task that has not finished yet.
    #[error("task already finished")]
    Finished,

    /// Event name does not match any known event.
    #[error("unknown event name: {name:?}")]
    UnknownEvent {
        /// The rejected name.
        name: String,
    },
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use countdown::TaskError;
    ///
    /// let err = TaskError::InvalidExecutions { executions: 0 };
    /// assert_eq!(err.as_label(), "config_invalid_executions");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::InvalidCountdown { .. } => "config_invalid_countdown",
            TaskError::InvalidExecutions { .. } => "config_invalid_executions",
            TaskError::Failed { .. } => "callback_failed",
            TaskError::Panicked { .. } => "callback_panicked",
            TaskError::Runtime { .. } => "runtime_unavailable",
            TaskError::Finished => "task_finished",
            TaskError::UnknownEvent { .. } => "unknown_event",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::InvalidCountdown { countdown_ms } => {
                format!("countdown must be non-negative, got {countdown_ms}ms")
            }
            TaskError::InvalidExecutions { executions } => {
                format!("executions must be at least 1, got {executions}")
            }
            TaskError::Failed { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Runtime { reason } => format!("runtime: {reason}"),
            TaskError::Finished => "task already finished".to_string(),
            TaskError::UnknownEvent { name } => format!("unknown event {name:?}"),
        }
    }

    /// True for errors raised by configuration validation in `run`.
    ///
    /// # Example
    /// ```
    /// use countdown::TaskError;
    ///
    /// assert!(TaskError::InvalidCountdown { countdown_ms: -1 }.is_configuration());
    /// assert!(!TaskError::Failed { error: "boom".into() }.is_configuration());
    /// ```
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TaskError::InvalidCountdown { .. } | TaskError::InvalidExecutions { .. }
        )
    }

    /// True for errors captured from the user callback.
    pub fn is_callback_failure(&self) -> bool {
        matches!(self, TaskError::Failed { .. } | TaskError::Panicked { .. })
    }

    /// Renders a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        TaskError::Panicked { info }
    }
}
