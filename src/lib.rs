//! # countdown
//!
//! **countdown** provides one abstraction: a *deferred, pausable, repeatable unit of work*.
//!
//! A [`Task`] wraps a callback and its arguments behind countdown scheduling. It can run
//! once after a delay, immediately, or a fixed number of times on an interval, and it can be
//! paused and resumed without losing the time already spent counting down.
//!
//! ## Architecture
//! ```text
//!   Task::new(callback, TaskConfig, args)          (no side effects)
//!        │
//!        ▼ run()  ── validate ──► invalid ──► publish Error, stay inert
//!   ┌──────────────────────────────────────────────┐
//!   │  Task (Arc<Mutex<State>>)                    │
//!   │   - Mode: Immediate | Interval | SingleShot  │
//!   │   - remaining countdown / executions         │
//!   │   - captured errors                          │
//!   └──────┬──────────────────────────────┬────────┘
//!          │ arm_once / arm_repeating     │ publish(Event)
//!          ▼                              ▼
//!   ┌──────────────┐  fire()      ┌──────────────────┐
//!   │ Timer        │ ───────────► │ Bus (broadcast)  │──► Task::subscribe()
//!   │ (TokioTimer) │  resolve()   └──────────────────┘──► SubscriberSet
//!   └──────────────┘                                       (Task::on / attach)
//! ```
//!
//! ## Lifecycle
//! ```text
//! start → (pause → resume)* → (result | error)* → end
//! ```
//! `end` is published exactly once and always last.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                 |
//! |-------------------|----------------------------------------------------------|------------------------------------|
//! | **Tasks**         | Deferred, pausable, repeatable callbacks.                | [`Task`], [`Mode`]                 |
//! | **Configuration** | Execution count and countdown, validated at `run`.       | [`TaskConfig`], [`Plan`]           |
//! | **Events**        | Lifecycle notifications, subscribe by kind or name.      | [`Event`], [`EventKind`]           |
//! | **Subscribers**   | Async observers fed from a task's bus.                   | [`Subscribe`], [`SubscriberSet`]   |
//! | **Timers**        | Pluggable timer primitive, tokio by default.             | [`Timer`], [`TokioTimer`]          |
//! | **Errors**        | Typed configuration, callback and runtime errors.        | [`TaskError`]                      |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] that traces every event _(demo/reference)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use countdown::{EventKind, Task, TaskConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let task = Task::new(
//!         |n: &u32| {
//!             if *n == 0 { return Err("zero"); }
//!             Ok(())
//!         },
//!         TaskConfig::repeat(2, Duration::from_millis(10)),
//!         7u32,
//!     );
//!
//!     let mut events = task.subscribe();
//!     task.run()?;
//!     loop {
//!         let ev = events.recv().await?;
//!         if ev.kind == EventKind::End { break; }
//!     }
//!     assert!(task.is_finished());
//!     assert!(!task.has_errors());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod subscribers;
mod tasks;
mod timer;

// ---- Public re-exports ----

pub use config::{Plan, TaskConfig};
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Listener, Subscribe, SubscriberSet};
pub use tasks::{Mode, Task, TaskSnapshot};
pub use timer::{Fire, Timer, TimerHandle, TokioTimer};

// Optional: expose a simple built-in tracing subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
