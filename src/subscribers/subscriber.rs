//! # Observer trait for run events.
//!
//! Anything that wants to watch a run as it plays out (a console printer, a
//! progress view, a test collector) implements [`Subscribe`] and is handed to
//! the dispatcher at construction. During a salvo the fan-out delivers every
//! event in publish order: one `TaskLaunched` per service as its stagger
//! offset elapses, a `TaskSent` or `TaskFailed` as it settles, and a single
//! `RunCancelled` or `RunCompleted` when the run closes.
//!
//! `on_event` runs on the subscriber's own worker task, behind a bounded lane
//! sized by `SimConfig::subscriber_queue`. Falling behind the salvo never
//! stalls the run: events that do not fit the lane are shed and counted (see
//! `Dispatcher::subscriber_report`). Rendering code can therefore take its
//! time and treat the journal, not the event stream, as the complete record
//! of a run.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use async_trait::async_trait;
//! use salvosim::{Event, EventKind, Subscribe};
//!
//! /// Counts services that settled as failed.
//! struct FailureCounter(AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::TaskFailed {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "failure-counter"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of dispatch events.
///
/// One instance sees every event the dispatcher publishes, in publish order,
/// one at a time on a dedicated worker task. Slow handling backs up only this
/// subscriber's lane; the dispatch timers and the other subscribers are
/// unaffected.
///
/// Panicking in `on_event` is tolerated: the worker catches it, counts it
/// against the subscriber, and moves on to the next event.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    ///
    /// Runs outside the dispatch path; taking long here delays this
    /// subscriber only. Events that arrive while the lane is full are shed
    /// and never reach this method.
    async fn on_event(&self, event: &Event);

    /// Name used in delivery reports and panic warnings.
    ///
    /// The default is `type_name::<Self>()`, which is verbose; prefer a
    /// short override like `"console"`.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
