//! # Task and its supporting types.
//!
//! - [`Task`] - the deferred, pausable, repeatable unit of work
//! - [`Mode`] - timer mode selected at arm time
//! - [`TaskSnapshot`] - point-in-time view, backs `Display`/`Debug`

mod mode;
mod snapshot;
mod state;
mod task;


pub use mode::Mode;
pub use snapshot::TaskSnapshot;
pub use task::Task;
