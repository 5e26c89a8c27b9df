//! # Timer-mode selection.
//!
//! [`Mode`] is chosen once per arm from the validated plan:
//!
//! ```text
//! countdown == 0             → Immediate   (next scheduling quantum)
//! countdown > 0, executions > 1 → Interval (repeats until exhausted)
//! otherwise                  → SingleShot  (one delayed firing)
//! ```

use std::fmt;
use std::time::Duration;

use crate::config::Plan;

/// How a task is armed on its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fires on the next scheduling quantum, re-armed after each non-final firing.
    Immediate,
    /// Fires every countdown through a repeating timer.
    Interval,
    /// One delayed firing.
    SingleShot,
}

impl Mode {
    /// Selects the mode for a countdown and execution count.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use countdown::Mode;
    ///
    /// assert_eq!(Mode::select(Duration::ZERO, 5), Mode::Immediate);
    /// assert_eq!(Mode::select(Duration::from_secs(1), 5), Mode::Interval);
    /// assert_eq!(Mode::select(Duration::from_secs(1), 1), Mode::SingleShot);
    /// ```
    pub fn select(countdown: Duration, executions: u64) -> Self {
        if countdown.is_zero() {
            Mode::Immediate
        } else if executions > 1 {
            Mode::Interval
        } else {
            Mode::SingleShot
        }
    }

    pub(crate) fn for_plan(plan: &Plan) -> Self {
        Self::select(plan.countdown, plan.executions)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Immediate => "immediate",
            Mode::Interval => "interval",
            Mode::SingleShot => "single-shot",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_countdown_wins_over_repeat() {
        assert_eq!(Mode::select(Duration::ZERO, 1), Mode::Immediate);
        assert_eq!(Mode::select(Duration::ZERO, u64::MAX), Mode::Immediate);
    }

    #[test]
    fn test_delayed_modes() {
        let d = Duration::from_millis(1);
        assert_eq!(Mode::select(d, 1), Mode::SingleShot);
        assert_eq!(Mode::select(d, 2), Mode::Interval);
    }

    #[test]
    fn test_for_plan() {
        let plan = Plan {
            executions: 3,
            countdown: Duration::from_secs(2),
        };
        assert_eq!(Mode::for_plan(&plan), Mode::Interval);
        assert_eq!(Mode::Interval.to_string(), "interval");
    }
}
