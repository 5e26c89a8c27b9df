//! # Event subscribers for countdown tasks.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the closure adapter behind [`Task::on`](crate::Task::on).
//!
//! ## Architecture
//! ```text
//! Task ── publish(Event) ──► Bus ──► Receiver (Task::subscribe)
//!                                └─► SubscriberSet::listen (Task::on / Task::attach)
//!                                        ├──► Listener (one EventKind)
//!                                        ├──► LogWriter   (feature "logging")
//!                                        └──► custom Subscribe impls
//! ```

mod listener;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use listener::Listener;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
