use async_trait::async_trait;

use super::Subscribe;
use crate::events::{Event, EventKind};

/// Closure subscriber bound to one [`EventKind`].
///
/// Backs [`Task::on`](crate::Task::on).
pub struct Listener<F> {
    kind: EventKind,
    f: F,
}

impl<F> Listener<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    pub fn new(kind: EventKind, f: F) -> Self {
        Self { kind, f }
    }
}

#[async_trait]
impl<F> Subscribe for Listener<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    async fn on_event(&self, event: &Event) {
        (self.f)(event);
    }

    fn name(&self) -> &'static str {
        "listener"
    }

    fn interest(&self, kind: EventKind) -> bool {
        kind == self.kind
    }
}
