//! # Task: deferred, pausable, repeatable unit of work.
//!
//! A [`Task`] wraps a callback and its arguments behind countdown scheduling.
//!
//! ## Lifecycle
//! ```text
//! new() ──► run() ──► [armed] ──fire──► resolve()
//!             │          │  ▲              ├─► callback(&args)
//!             │     pause()  resume()      ├─► publish result | error
//!             │          ▼  │              ├─► remaining_executions -= 1
//!             │       [paused]             └─► 0 ? finalize : continue
//!             │
//!             └─► invalid config ──► publish error (never armed)
//!
//! terminate() ──► finalize: cancel timer, ended_at, finished, publish end
//! ```
//!
//! ## Rules
//! - Construction has no scheduling side effects; configuration is validated by `run`.
//! - Callback failures (returned `Err` or panic) are recorded and reported, never fatal.
//! - Pausing deducts the time elapsed since the pending firing was armed from
//!   the remaining countdown; resuming re-arms with what is left.
//! - The pending firing's countdown restarts when a firing begins, before the callback runs.
//! - Firings never overlap: arming while a callback runs is deferred until it returns.
//! - `end` is published exactly once, and last.
//! - Events are published while the state lock is held, so every receiver
//!   observes them in state-transition order.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::TaskConfig;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Listener, Subscribe, SubscriberSet};
use crate::tasks::mode::Mode;
use crate::tasks::snapshot::TaskSnapshot;
use crate::tasks::state::{Armed, Stamp, State};
use crate::timer::{Fire, Timer, TimerHandle, TokioTimer};

/// Process-wide task id counter.
static TASK_SEQ: AtomicU64 = AtomicU64::new(1);

type Callback = Box<dyn Fn() -> Result<(), TaskError> + Send + Sync + 'static>;

struct Inner {
    id: u64,
    config: TaskConfig,
    callback: Callback,
    timer: Arc<dyn Timer>,
    bus: Bus,
    state: Mutex<State>,
}

/// Deferred, pausable, repeatable unit of work.
///
/// Cheap to clone; clones share the same state. An armed timer keeps the task alive
/// until it finalizes, so the caller may drop its handles after `run`.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use countdown::{EventKind, Task, TaskConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), countdown::TaskError> {
///     let task = Task::new(
///         |name: &String| {
///             println!("hello {name}");
///             Ok::<(), String>(())
///         },
///         TaskConfig::repeat(3, Duration::from_millis(200)),
///         "world".to_string(),
///     );
///
///     let mut events = task.subscribe();
///     task.run()?;
///     while let Ok(ev) = events.recv().await {
///         if ev.kind == EventKind::End {
///             break;
///         }
///     }
///     assert_eq!(task.remaining_executions(), 0);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Task {
    inner: Arc<Inner>,
}

impl Task {
    /// Creates a task scheduled on the default [`TokioTimer`].
    ///
    /// `args` is handed to `callback` by reference on every firing.
    pub fn new<F, A, E>(callback: F, config: TaskConfig, args: A) -> Self
    where
        F: Fn(&A) -> Result<(), E> + Send + Sync + 'static,
        A: Send + Sync + 'static,
        E: fmt::Display,
    {
        Self::with_timer(callback, config, args, Arc::new(TokioTimer::new()))
    }

    /// Creates a task scheduled on a custom [`Timer`].
    pub fn with_timer<F, A, E>(
        callback: F,
        config: TaskConfig,
        args: A,
        timer: Arc<dyn Timer>,
    ) -> Self
    where
        F: Fn(&A) -> Result<(), E> + Send + Sync + 'static,
        A: Send + Sync + 'static,
        E: fmt::Display,
    {
        let callback: Callback = Box::new(move || {
            callback(&args).map_err(|e| TaskError::Failed {
                error: e.to_string(),
            })
        });
        let state = State::new(
            config.countdown().unwrap_or_default(),
            u64::try_from(config.executions).unwrap_or(0),
        );
        Self {
            inner: Arc::new(Inner {
                id: TASK_SEQ.fetch_add(1, Ordering::Relaxed),
                bus: Bus::new(config.bus_capacity_clamped()),
                config,
                callback,
                timer,
                state: Mutex::new(state),
            }),
        }
    }

    /// Validates the configuration and arms the timer.
    ///
    /// ### Outcome
    /// - valid config: mode selected, `started_at` recorded, timer armed, `start` published;
    /// - invalid config: `error` published with the configuration error, task stays inert;
    /// - timer refused to arm: `error` published, task stays inert.
    ///
    /// Calling `run` on an armed or paused task cancels the pending timer and re-arms
    /// with the full countdown. Calling it on a finished task returns [`TaskError::Finished`].
    pub fn run(&self) -> Result<(), TaskError> {
        let mut st = self.lock();
        if st.finished {
            return Err(TaskError::Finished);
        }

        let plan = match self.inner.config.validate() {
            Ok(plan) => plan,
            Err(e) => {
                warn!(task = self.id(), error = %e, "rejected task configuration");
                self.publish(Event::new(EventKind::Error, self.id()).with_error(e.clone()));
                return Err(e);
            }
        };

        if let Some(old) = st.armed.take() {
            self.inner.timer.cancel(old.handle);
        }
        if st.plan.is_none() {
            st.remaining_executions = plan.executions;
        }
        let mode = Mode::for_plan(&plan);
        st.plan = Some(plan);
        st.mode = Some(mode);
        st.remaining_countdown = plan.countdown;
        st.paused = false;

        if let Err(e) = self.arm(&mut st) {
            warn!(task = self.id(), error = %e, "failed to arm task");
            self.publish(Event::new(EventKind::Error, self.id()).with_error(e.clone()));
            return Err(e);
        }
        st.started = Some(Stamp::now());
        debug!(task = self.id(), %mode, countdown = ?plan.countdown, executions = plan.executions, "task started");
        self.publish(Event::new(EventKind::Start, self.id()));
        Ok(())
    }

    /// Disarms the pending firing and keeps the unspent countdown.
    ///
    /// Returns `false` (no-op, no event) if the task is not armed: never run,
    /// already paused, or finished.
    pub fn pause(&self) -> bool {
        let mut st = self.lock();
        if st.finished || st.paused {
            return false;
        }
        if let Some(armed) = st.armed.take() {
            let elapsed = armed.since.elapsed();
            self.inner.timer.cancel(armed.handle);
            st.remaining_countdown = st.remaining_countdown.saturating_sub(elapsed);
        } else if !std::mem::take(&mut st.rearm_pending) {
            return false;
        }
        st.paused = true;

        debug!(task = self.id(), remaining = ?st.remaining_countdown, "task paused");
        self.publish(Event::new(EventKind::Pause, self.id()).with_remaining(st.remaining_countdown));
        true
    }

    /// Re-arms a paused task with its remaining countdown.
    ///
    /// Returns `Ok(false)` (no-op, no event) unless the task is paused and not finished.
    /// If the timer refuses to arm, the task stays paused and the error is returned.
    pub fn resume(&self) -> Result<bool, TaskError> {
        let mut st = self.lock();
        if st.finished || !st.paused {
            return Ok(false);
        }
        self.arm(&mut st)?;
        st.paused = false;

        debug!(task = self.id(), remaining = ?st.remaining_countdown, "task resumed");
        self.publish(Event::new(EventKind::Resume, self.id()).with_remaining(st.remaining_countdown));
        Ok(true)
    }

    /// Force-finalizes the task regardless of remaining executions.
    ///
    /// Returns `false` if the task was already finished. No firing is delivered
    /// after `terminate` returns.
    pub fn terminate(&self) -> bool {
        let mut st = self.lock();
        if st.finished {
            return false;
        }
        debug!(task = self.id(), remaining = st.remaining_executions, "task terminated");
        self.finalize(&mut st);
        true
    }

    // ---- Accessors ----

    /// Process-wide unique id, assigned at construction.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Configuration the task was constructed with.
    pub fn config(&self) -> &TaskConfig {
        &self.inner.config
    }

    /// Mode selected by the last successful `run`.
    pub fn mode(&self) -> Option<Mode> {
        self.lock().mode
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    /// True while running, not paused and not finished.
    ///
    /// Also true while an arm requested during a callback waits for it to return.
    pub fn is_armed(&self) -> bool {
        self.lock().is_armed()
    }

    pub fn has_errors(&self) -> bool {
        !self.lock().errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.lock().errors.len()
    }

    /// All captured callback failures, in firing order.
    pub fn errors(&self) -> Vec<TaskError> {
        self.lock().errors.clone()
    }

    pub fn last_error(&self) -> Option<TaskError> {
        self.lock().errors.last().cloned()
    }

    /// Configured execution count (as given, possibly invalid).
    pub fn total_executions(&self) -> i64 {
        self.inner.config.executions
    }

    /// Firings left before the task finalizes.
    ///
    /// Zero once finished. A task that was never run also reports zero when its
    /// configured execution count is invalid; [`mode`](Self::mode) is `None` then.
    pub fn remaining_executions(&self) -> u64 {
        self.lock().remaining_executions
    }

    /// Number of firings that reached the callback.
    pub fn firings(&self) -> u64 {
        self.lock().firings
    }

    /// Configured countdown; `None` if negative.
    pub fn planned_countdown(&self) -> Option<Duration> {
        self.inner.config.countdown()
    }

    /// Countdown left for the pending firing, as of the last arm or pause.
    pub fn remaining_countdown(&self) -> Duration {
        self.lock().remaining_countdown
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.lock().started.map(|s| s.at)
    }

    pub fn ended_at(&self) -> Option<SystemTime> {
        self.lock().ended.map(|s| s.at)
    }

    /// Time from `run` to finalization; `None` until both happened.
    pub fn duration(&self) -> Option<Duration> {
        let st = self.lock();
        Self::duration_of(&st)
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        let st = self.lock();
        TaskSnapshot {
            id: self.id(),
            mode: st.mode,
            total_executions: self.inner.config.executions,
            remaining_executions: st.remaining_executions,
            firings: st.firings,
            planned_countdown: self.inner.config.countdown(),
            remaining_countdown: st.remaining_countdown,
            armed: st.is_armed(),
            paused: st.paused,
            finished: st.finished,
            errors: st.errors.len(),
            duration: Self::duration_of(&st),
        }
    }

    // ---- Notifications ----

    /// Creates a receiver for subsequent events of this task.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Calls `f` for every subsequent event of `kind`.
    ///
    /// The listener runs on a tokio task and stops after `end`.
    /// Names parse into kinds: `task.on("result".parse()?, f)`.
    pub fn on<F>(&self, kind: EventKind, f: F) -> Result<JoinHandle<()>, TaskError>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.attach(vec![Arc::new(Listener::new(kind, f))])
    }

    /// Feeds subsequent events to `subscribers` until `end`.
    pub fn attach(&self, subscribers: Vec<Arc<dyn Subscribe>>) -> Result<JoinHandle<()>, TaskError> {
        let rt = tokio::runtime::Handle::try_current().map_err(|e| TaskError::Runtime {
            reason: e.to_string(),
        })?;
        let rx = self.subscribe();
        Ok(rt.spawn(async move { SubscriberSet::new(subscribers).listen(rx).await }))
    }

    // ---- Internals ----

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, ev: Event) {
        self.inner.bus.publish(ev);
    }

    fn duration_of(st: &State) -> Option<Duration> {
        match (st.started, st.ended) {
            (Some(s), Some(e)) => Some(e.instant.saturating_duration_since(s.instant)),
            _ => None,
        }
    }

    /// Arms the timer for the pending firing according to the mode.
    ///
    /// Interval mode uses a repeating timer only when the pending firing has its full
    /// countdown; after a depleted resume it arms once and switches back to repeating
    /// after that firing.
    ///
    /// While a callback is in flight the request is only recorded; the firing path
    /// arms once the callback returns.
    fn arm(&self, st: &mut State) -> Result<(), TaskError> {
        let (Some(plan), Some(mode)) = (st.plan, st.mode) else {
            return Err(TaskError::Runtime {
                reason: "task has no validated plan".to_string(),
            });
        };
        if st.in_flight {
            st.rearm_pending = true;
            return Ok(());
        }
        st.rearm_pending = false;
        let generation = st.next_generation();
        let fire = self.fire_fn(generation);
        let timer = &self.inner.timer;

        let (handle, repeating): (TimerHandle, bool) = match mode {
            Mode::Immediate => (timer.arm_once(Duration::ZERO, fire)?, false),
            Mode::SingleShot => (timer.arm_once(st.remaining_countdown, fire)?, false),
            Mode::Interval if st.remaining_countdown == plan.countdown => {
                (timer.arm_repeating(plan.countdown, fire)?, true)
            }
            Mode::Interval => (timer.arm_once(st.remaining_countdown, fire)?, false),
        };
        st.armed = Some(Armed {
            handle,
            generation,
            repeating,
            since: Instant::now(),
        });
        Ok(())
    }

    fn fire_fn(&self, generation: u64) -> Fire {
        let task = self.clone();
        Arc::new(move || task.resolve(generation))
    }

    /// Handles one firing: callback, report, completion accounting.
    fn resolve(&self, generation: u64) {
        let firing = {
            let mut st = self.lock();
            if !st.accepts(generation) {
                debug!(task = self.id(), generation, "dropped stale firing");
                return;
            }
            st.firings += 1;
            st.in_flight = true;
            if let Some(plan) = st.plan {
                st.remaining_countdown = plan.countdown;
            }
            if let Some(armed) = st.armed.as_mut() {
                armed.since = Instant::now();
            }
            st.firings
        };

        let outcome = match catch_unwind(AssertUnwindSafe(|| (self.inner.callback)())) {
            Ok(res) => res,
            Err(panic) => Err(TaskError::from_panic(panic.as_ref())),
        };

        let mut st = self.lock();
        st.in_flight = false;
        if let Err(e) = &outcome {
            st.errors.push(e.clone());
        }
        if st.finished {
            debug!(task = self.id(), firing, "firing completed after termination");
            return;
        }
        match outcome {
            Ok(()) => {
                self.publish(Event::new(EventKind::Result, self.id()).with_firing(firing));
            }
            Err(e) => {
                warn!(task = self.id(), firing, error = %e, "callback failed");
                self.publish(
                    Event::new(EventKind::Error, self.id())
                        .with_firing(firing)
                        .with_error(e),
                );
            }
        }

        st.remaining_executions = st.remaining_executions.saturating_sub(1);
        if st.remaining_executions == 0 {
            self.finalize(&mut st);
            return;
        }
        self.continue_after(&mut st, generation);
    }

    /// Prepares the next pending firing once a non-final firing completed.
    ///
    /// A repeating timer keeps going on its own; a spent one-shot, or an arm deferred
    /// by `run`/`resume` during the callback, is armed here.
    fn continue_after(&self, st: &mut State, generation: u64) {
        if st.paused {
            return;
        }
        let rearm = st.rearm_pending
            || st
                .armed
                .as_ref()
                .is_some_and(|a| a.generation == generation && !a.repeating);
        if rearm {
            if let Err(e) = self.arm(st) {
                warn!(task = self.id(), error = %e, "failed to re-arm task");
                st.errors.push(e.clone());
                self.publish(Event::new(EventKind::Error, self.id()).with_error(e));
                self.finalize(st);
            }
        }
    }

    fn finalize(&self, st: &mut State) {
        if let Some(armed) = st.armed.take() {
            self.inner.timer.cancel(armed.handle);
        }
        st.remaining_executions = 0;
        st.rearm_pending = false;
        st.paused = false;
        st.finished = true;
        st.ended = Some(Stamp::now());
        debug!(task = self.id(), firings = st.firings, errors = st.errors.len(), "task finished");
        self.publish(Event::new(EventKind::End, self.id()).with_firing(st.firings));
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.snapshot(), f)
    }
}
