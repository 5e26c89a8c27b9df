//! # LogWriter: event tracer
//!
//! A minimal subscriber that reports incoming [`Event`]s through `tracing`.
//! Use it for debugging or demos; install a `tracing` subscriber to see output.
//!
//! ## Example output
//! ```text
//! INFO countdown: [start] task=3
//! INFO countdown: [pause] task=3 remaining=350ms
//! INFO countdown: [resume] task=3 remaining=350ms
//! INFO countdown: [result] task=3 firing=1
//! WARN countdown: [error] task=3 firing=2 err="callback failed: boom"
//! INFO countdown: [end] task=3 firings=2
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Start => {
                info!(target: "countdown", "[start] task={}", e.task);
            }
            EventKind::Pause => {
                info!(target: "countdown", "[pause] task={} remaining={:?}", e.task, e.remaining);
            }
            EventKind::Resume => {
                info!(target: "countdown", "[resume] task={} remaining={:?}", e.task, e.remaining);
            }
            EventKind::Result => {
                info!(target: "countdown", "[result] task={} firing={:?}", e.task, e.firing);
            }
            EventKind::Error => {
                let err = e.error.as_ref().map(ToString::to_string);
                warn!(target: "countdown", "[error] task={} firing={:?} err={:?}", e.task, e.firing, err);
            }
            EventKind::End => {
                info!(target: "countdown", "[end] task={} firings={:?}", e.task, e.firing);
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
