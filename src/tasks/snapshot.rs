use std::fmt;
use std::time::Duration;

use crate::tasks::mode::Mode;

/// Point-in-time copy of a task's observable state.
///
/// Also backs the task's `Display` and `Debug` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub id: u64,
    /// `None` until the first successful `run`.
    pub mode: Option<Mode>,
    /// Execution count as configured (may be invalid).
    pub total_executions: i64,
    pub remaining_executions: u64,
    pub firings: u64,
    /// Countdown as configured; `None` if negative.
    pub planned_countdown: Option<Duration>,
    pub remaining_countdown: Duration,
    pub armed: bool,
    pub paused: bool,
    pub finished: bool,
    pub errors: usize,
    pub duration: Option<Duration>,
}

impl fmt::Display for TaskSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task#{} {{ mode: ", self.id)?;
        match self.mode {
            Some(m) => write!(f, "{m}")?,
            None => f.write_str("idle")?,
        }
        write!(
            f,
            ", executions: {}/{}, countdown: {:?}/",
            self.remaining_executions, self.total_executions, self.remaining_countdown
        )?;
        match self.planned_countdown {
            Some(d) => write!(f, "{d:?}")?,
            None => f.write_str("invalid")?,
        }
        write!(
            f,
            ", armed: {}, paused: {}, finished: {}, errors: {}",
            self.armed, self.paused, self.finished, self.errors
        )?;
        if let Some(d) = self.duration {
            write!(f, ", duration: {d:?}")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_idle_and_finished() {
        let mut snap = TaskSnapshot {
            id: 4,
            mode: None,
            total_executions: 3,
            remaining_executions: 3,
            firings: 0,
            planned_countdown: Some(Duration::from_millis(500)),
            remaining_countdown: Duration::from_millis(500),
            armed: false,
            paused: false,
            finished: false,
            errors: 0,
            duration: None,
        };
        assert_eq!(
            snap.to_string(),
            "Task#4 { mode: idle, executions: 3/3, countdown: 500ms/500ms, \
             armed: false, paused: false, finished: false, errors: 0 }"
        );

        snap.mode = Some(Mode::Interval);
        snap.remaining_executions = 0;
        snap.finished = true;
        snap.duration = Some(Duration::from_millis(1500));
        assert!(snap.to_string().contains("mode: interval"));
        assert!(snap.to_string().ends_with("duration: 1.5s }"));
    }

    #[test]
    fn test_display_invalid_countdown() {
        let snap = TaskSnapshot {
            id: 1,
            mode: None,
            total_executions: 1,
            remaining_executions: 1,
            firings: 0,
            planned_countdown: None,
            remaining_countdown: Duration::ZERO,
            armed: false,
            paused: false,
            finished: false,
            errors: 0,
            duration: None,
        };
        assert!(snap.to_string().contains("countdown: 0ns/invalid"));
    }
}
