//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers **without
//! awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order), so one subscriber sees a task's events in order.
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that
//!   subscriber).
//!
//! ## Diagram
//! ```text
//!  Task bus ─► listen(rx) ─► emit(&Event)
//!                               ├──► [queue S1] ─► worker S1 ─► on_event()
//!                               ├──► [queue S2] ─► worker S2 ─► on_event()
//!                               └──► [queue SN] ─► worker SN ─► on_event()
//!  `end` or bus closed ─► shutdown(): close queues, join workers
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use super::Subscribe;
use crate::error::TaskError;
use crate::events::Event;

/// Per-subscriber channel with metadata.
struct SubscriberChannel {
    sub: Arc<dyn Subscribe>,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await
                    {
                        let info = TaskError::from_panic(panic_err.as_ref());
                        warn!(subscriber = s.name(), task = ev.task, error = %info, "subscriber panicked");
                    }
                }
            });

            channels.push(SubscriberChannel { sub, sender: tx });
            workers.push(handle);
        }

        Self { channels, workers }
    }

    /// Fan-out one event to all interested subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped for it
    /// and a warning is logged with the subscriber's name.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            if !channel.sub.interest(ev.kind) {
                continue;
            }
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = channel.sub.name(), kind = %ev.kind, "dropped event: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(subscriber = channel.sub.name(), kind = %ev.kind, "dropped event: worker closed");
                }
            }
        }
    }

    /// Drives the set from a task's bus receiver.
    ///
    /// Stops after forwarding the `end` event or when the bus closes,
    /// then shuts the workers down gracefully.
    pub async fn listen(self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let end = ev.is_end();
                    self.emit(&ev);
                    if end {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber listener lagged behind task bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
        self.shutdown().await;
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::events::{Bus, EventKind};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct OnlyErrors(Recorder);

    #[async_trait]
    impl Subscribe for OnlyErrors {
        async fn on_event(&self, ev: &Event) {
            self.0.on_event(ev).await;
        }
        fn interest(&self, kind: EventKind) -> bool {
            kind == EventKind::Error
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _ev: &Event) {
            panic!("subscriber exploded");
        }
    }

    #[tokio::test]
    async fn test_listen_forwards_until_end() {
        let bus = Bus::new(16);
        let all = Arc::new(Recorder::default());
        let errors = Arc::new(OnlyErrors(Recorder::default()));
        let set = SubscriberSet::new(vec![
            all.clone() as Arc<dyn Subscribe>,
            errors.clone() as Arc<dyn Subscribe>,
        ]);
        assert_eq!(set.len(), 2);

        let listener = tokio::spawn(set.listen(bus.subscribe()));
        for kind in [EventKind::Start, EventKind::Error, EventKind::End, EventKind::Result] {
            bus.publish(Event::new(kind, 1));
        }
        listener.await.unwrap();

        assert_eq!(
            *all.seen.lock().unwrap(),
            vec![EventKind::Start, EventKind::Error, EventKind::End]
        );
        assert_eq!(*errors.0.seen.lock().unwrap(), vec![EventKind::Error]);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let bus = Bus::new(16);
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![
            Arc::new(Panicker) as Arc<dyn Subscribe>,
            rec.clone() as Arc<dyn Subscribe>,
        ]);

        let listener = tokio::spawn(set.listen(bus.subscribe()));
        bus.publish(Event::new(EventKind::Start, 9));
        bus.publish(Event::new(EventKind::End, 9));
        listener.await.unwrap();

        assert_eq!(*rec.seen.lock().unwrap(), vec![EventKind::Start, EventKind::End]);
    }

    #[tokio::test]
    async fn test_listen_stops_when_bus_closes() {
        let bus = Bus::new(4);
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![rec.clone() as Arc<dyn Subscribe>]);
        let listener = tokio::spawn(set.listen(bus.subscribe()));

        bus.publish(Event::new(EventKind::Start, 2));
        drop(bus);
        listener.await.unwrap();
        assert_eq!(*rec.seen.lock().unwrap(), vec![EventKind::Start]);
    }
}
