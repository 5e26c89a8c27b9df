use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

static HANDLE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to one armed timer.
///
/// Backed by a [`CancellationToken`]; timer implementations watch the token and stop
/// delivering firings once it is cancelled. Dropping the handle does **not** cancel it.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    token: CancellationToken,
}

impl TimerHandle {
    /// Creates a fresh, uncancelled handle.
    pub fn new() -> Self {
        Self {
            id: HANDLE_SEQ.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        }
    }

    /// Unique id of this handle (diagnostics only).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token that timer implementations watch for cancellation.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels future firings. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}
