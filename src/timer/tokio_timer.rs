//! # Tokio-backed timer.
//!
//! Each armed timer is one spawned tokio task:
//!
//! ```text
//! arm_once(d):       spawn ─► select! { cancelled ─► exit | sleep(d) ─► fire() }
//! arm_once(0):       spawn ─► yield_now ─► (not cancelled) ─► fire()
//! arm_repeating(i):  spawn ─► loop select! { cancelled ─► exit | tick ─► fire() }
//! ```
//!
//! `select!` is `biased` so a cancellation observed at the same time as a tick wins.
//! The first repeating tick happens one interval after arming, and missed ticks are
//! delayed rather than burst.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::select;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{Fire, Timer, TimerHandle};
use crate::error::TaskError;

/// [`Timer`] that schedules firings on a tokio runtime.
///
/// Without an explicit runtime handle, the runtime entered at arm time is used.
#[derive(Clone, Debug, Default)]
pub struct TokioTimer {
    runtime: Option<Handle>,
}

impl TokioTimer {
    /// Uses whichever runtime is current when arming.
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Always spawns onto `runtime`, so tasks can be armed from non-runtime threads.
    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }

    fn runtime(&self) -> Result<Handle, TaskError> {
        match &self.runtime {
            Some(h) => Ok(h.clone()),
            None => Handle::try_current().map_err(|e| TaskError::Runtime {
                reason: e.to_string(),
            }),
        }
    }
}

impl Timer for TokioTimer {
    fn arm_once(&self, delay: Duration, fire: Fire) -> Result<TimerHandle, TaskError> {
        let rt = self.runtime()?;
        let handle = TimerHandle::new();
        let token = handle.token().clone();

        rt.spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
                if !token.is_cancelled() {
                    fire();
                }
                return;
            }
            select! {
                biased;
                _ = token.cancelled() => {}
                _ = time::sleep(delay) => fire(),
            }
        });
        Ok(handle)
    }

    fn arm_repeating(&self, interval: Duration, fire: Fire) -> Result<TimerHandle, TaskError> {
        if interval.is_zero() {
            return Err(TaskError::Runtime {
                reason: "repeating timer needs a non-zero interval".to_string(),
            });
        }
        let rt = self.runtime()?;
        let handle = TimerHandle::new();
        let token = handle.token().clone();

        rt.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => fire(),
                }
            }
        });
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Fire) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let fire: Fire = Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (hits, fire)
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let (hits, fire) = counter();
        let _h = TokioTimer::new()
            .arm_once(Duration::from_millis(100), fire)
            .unwrap();

        time::sleep(Duration::from_millis(99)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_fires_next_quantum() {
        let (hits, fire) = counter();
        let _h = TokioTimer::new().arm_once(Duration::ZERO, fire).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let (hits, fire) = counter();
        let timer = TokioTimer::new();
        let h = timer.arm_once(Duration::from_millis(50), fire).unwrap();
        timer.cancel(h);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_until_cancelled() {
        let (hits, fire) = counter();
        let timer = TokioTimer::new();
        let h = timer
            .arm_repeating(Duration::from_millis(100), fire)
            .unwrap();

        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        timer.cancel(h);
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let (_hits, fire) = counter();
        let err = TokioTimer::new()
            .arm_repeating(Duration::ZERO, fire)
            .unwrap_err();
        assert!(matches!(err, TaskError::Runtime { .. }));
    }

    #[test]
    fn test_no_runtime_is_an_error() {
        let (_hits, fire) = counter();
        let err = TokioTimer::new()
            .arm_once(Duration::from_millis(1), fire)
            .unwrap_err();
        assert_eq!(err.as_label(), "runtime_unavailable");
    }
}
