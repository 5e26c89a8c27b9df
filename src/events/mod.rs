//! Task events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the task itself (`run`, `pause`, `resume`, the firing resolver, `terminate`).
//! - **Consumers**: raw receivers from `Task::subscribe`, and `SubscriberSet` listeners
//!   started by `Task::on` / `Task::attach`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
