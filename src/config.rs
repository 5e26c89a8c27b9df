//! # Task configuration.
//!
//! Provides [`TaskConfig`], the settings a [`Task`](crate::Task) is constructed with.
//!
//! Construction never validates. Validation happens in [`Task::run`](crate::Task::run)
//! through [`TaskConfig::validate`], so that invalid settings are reported through the
//! task's `error` event instead of failing at construction.
//!
//! ## Field semantics
//! - `executions = 1` → single firing
//! - `executions > 1` → repeating task
//! - `executions <= 0` → configuration error at `run`
//! - `countdown_ms = 0` → fire on the next scheduling quantum
//! - `countdown_ms < 0` → configuration error at `run`

use std::time::Duration;

use crate::error::TaskError;

/// Configuration for a single countdown task.
///
/// All fields are public. Signed integers are used on purpose so that
/// out-of-range settings can be represented and reported at `run` time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskConfig {
    /// Number of times the callback should fire.
    pub executions: i64,

    /// Delay before each firing, in milliseconds.
    pub countdown_ms: i64,

    /// Capacity of the task's event bus ring buffer (min 1; clamped).
    pub bus_capacity: usize,
}

/// Validated configuration, produced by [`TaskConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plan {
    /// Number of firings (at least 1).
    pub executions: u64,
    /// Delay before each firing.
    pub countdown: Duration,
}

impl TaskConfig {
    /// Creates a config firing `executions` times, `countdown` apart.
    ///
    /// The countdown is kept in whole milliseconds, truncated; a non-zero countdown
    /// below one millisecond becomes 1ms so it never selects the immediate mode.
    pub fn new(executions: i64, countdown: Duration) -> Self {
        Self {
            executions,
            countdown_ms: duration_to_ms(countdown),
            ..Self::default()
        }
    }

    /// Single firing after `countdown`.
    pub fn once(countdown: Duration) -> Self {
        Self::new(1, countdown)
    }

    /// `n` firings, `countdown` apart.
    pub fn repeat(n: i64, countdown: Duration) -> Self {
        Self::new(n, countdown)
    }

    /// Fires every `countdown` until terminated.
    ///
    /// Uses `i64::MAX` executions, which is unreachable in practice.
    pub fn forever(countdown: Duration) -> Self {
        Self::new(i64::MAX, countdown)
    }

    /// Returns a config with the given bus capacity.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Returns the countdown as a `Duration`, or `None` if negative.
    #[inline]
    pub fn countdown(&self) -> Option<Duration> {
        u64::try_from(self.countdown_ms)
            .ok()
            .map(Duration::from_millis)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks the configuration and produces a [`Plan`].
    ///
    /// The countdown is checked before the execution count.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use countdown::{TaskConfig, TaskError};
    ///
    /// let plan = TaskConfig::repeat(3, Duration::from_millis(250)).validate().unwrap();
    /// assert_eq!(plan.executions, 3);
    ///
    /// let err = TaskConfig::repeat(0, Duration::ZERO).validate().unwrap_err();
    /// assert_eq!(err, TaskError::InvalidExecutions { executions: 0 });
    /// ```
    pub fn validate(&self) -> Result<Plan, TaskError> {
        let countdown = self.countdown().ok_or(TaskError::InvalidCountdown {
            countdown_ms: self.countdown_ms,
        })?;
        let executions = u64::try_from(self.executions)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(TaskError::InvalidExecutions {
                executions: self.executions,
            })?;
        Ok(Plan {
            executions,
            countdown,
        })
    }
}

impl Default for TaskConfig {
    /// Default configuration:
    ///
    /// - `executions = 1` (single firing)
    /// - `countdown_ms = 0` (next scheduling quantum)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            executions: 1,
            countdown_ms: 0,
            bus_capacity: 1024,
        }
    }
}

fn duration_to_ms(d: Duration) -> i64 {
    if !d.is_zero() && d < Duration::from_millis(1) {
        return 1;
    }
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_immediate() {
        let plan = TaskConfig::default().validate().unwrap();
        assert_eq!(plan.executions, 1);
        assert_eq!(plan.countdown, Duration::ZERO);
    }

    #[test]
    fn test_negative_countdown_rejected() {
        let cfg = TaskConfig {
            countdown_ms: -1,
            ..TaskConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(TaskError::InvalidCountdown { countdown_ms: -1 })
        );
        assert!(cfg.countdown().is_none());
    }

    #[test]
    fn test_non_positive_executions_rejected() {
        for n in [0, -1, i64::MIN] {
            let cfg = TaskConfig::repeat(n, Duration::from_secs(1));
            assert_eq!(
                cfg.validate(),
                Err(TaskError::InvalidExecutions { executions: n })
            );
        }
    }

    #[test]
    fn test_countdown_checked_first() {
        let cfg = TaskConfig {
            executions: 0,
            countdown_ms: -3,
            ..TaskConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(TaskError::InvalidCountdown { countdown_ms: -3 })
        );
    }

    #[test]
    fn test_helpers() {
        assert_eq!(TaskConfig::once(Duration::from_millis(1500)).countdown_ms, 1500);
        assert_eq!(TaskConfig::forever(Duration::from_secs(1)).executions, i64::MAX);
        assert_eq!(
            TaskConfig::default().with_bus_capacity(0).bus_capacity_clamped(),
            1
        );
    }

    #[test]
    fn test_sub_millisecond_countdown_rounds_up() {
        let cfg = TaskConfig::once(Duration::from_micros(500));
        assert_eq!(cfg.countdown_ms, 1);
        assert_eq!(cfg.countdown(), Some(Duration::from_millis(1)));
        assert_eq!(
            crate::Mode::for_plan(&cfg.validate().unwrap()),
            crate::Mode::SingleShot
        );
        assert_eq!(TaskConfig::once(Duration::from_nanos(1)).countdown_ms, 1);
        assert_eq!(TaskConfig::once(Duration::ZERO).countdown_ms, 0);
        assert_eq!(TaskConfig::once(Duration::from_micros(2500)).countdown_ms, 2);
    }
}
