//! # salvosim
//!
//! **Salvosim** is a staggered-dispatch simulator for Rust.
//!
//! It models a burst of send tasks fanned out over a fixed roster of
//! fictional gateway services: each service launches after its own delay,
//! holds a simulated send for a while, then settles as sent or failed by a
//! weighted coin flip. No packet ever leaves the process. The crate is
//! designed as the engine behind dispatch-drill UIs and load-shape
//! experiments.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            start(target, interval)
//!                     │
//! ┌───────────────────▼───────────────────────────────────────────┐
//! │  Dispatcher                                                   │
//! │  - Roster (ordered services)                                  │
//! │  - StateBoard (one TaskState per service)                     │
//! │  - Journal (append-only, seq-stamped entries)                 │
//! │  - Bus (broadcast events)                                     │
//! │  - SessionSlot (at most one live RunSession)                  │
//! └──────┬──────────────┬──────────────┬───────────────┬──────────┘
//!        ▼              ▼              ▼               ▼
//!   ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌───────────┐
//!   │launch #0│    │launch #1│    │launch #N│    │  horizon  │
//!   │offset 0 │    │offset I │    │offset NI│    │ watchdog  │
//!   └────┬────┘    └────┬────┘    └────┬────┘    └─────┬─────┘
//!        │ sending/settle under board lock             │ auto-stop
//!        ▼              ▼              ▼               ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                   │
//! └──────────────┬──────────────────────────────┬─────────────────┘
//!                ▼                              ▼
//!    Dispatcher::subscribe()           subscriber listener
//!      (ad-hoc receivers)                      │
//!                                       SubscriberSet
//!                                    (per-sub queues+workers)
//! ```
//!
//! ### Lifecycle of one launch
//! ```text
//! spawn at start()
//!   ├─► sleep(position × interval)     (cancellable)
//!   ├─► board: idle → sending, bus: TaskLaunched
//!   ├─► sleep(work.sample())           (cancellable)
//!   ├─► outcome.draw()
//!   └─► board: sending → sent | error
//!       journal + bus: TaskSent | TaskFailed
//!
//! stop() or horizon:
//!   ├─► session out of slot, flag off, timers aborted
//!   ├─► board: everything → idle
//!   └─► journal + bus: RunCancelled | RunCompleted   (exactly one)
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                  |
//! |-------------------|------------------------------------------------------------------|-------------------------------------|
//! | **Dispatch**      | Start, observe and stop staggered simulated runs.               | [`Dispatcher`], [`RunInfo`]         |
//! | **Validation**    | Canonicalize operator input into a checked target.              | [`Msisdn`]                          |
//! | **States**        | Per-service lifecycle and run-wide counts.                      | [`TaskState`], [`Tally`]            |
//! | **Events**        | Sequenced journal entries and live bus pushes.                  | [`Event`], [`EventKind`]            |
//! | **Policies**      | Shape simulated send durations and outcomes.                    | [`WorkPolicy`], [`OutcomePolicy`]   |
//! | **Subscriber API**| Hook into run events (logging, UIs, custom observers).          | [`Subscribe`], [`SubscriberSet`]    |
//! | **Errors**        | Typed refusals at the start boundary.                           | [`StartError`], [`MsisdnError`]     |
//! | **Configuration** | Centralize simulator settings.                                  | [`SimConfig`]                       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use salvosim::{Dispatcher, OutcomePolicy, Roster, SimConfig, WorkPolicy};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = SimConfig {
//!         work: WorkPolicy::fixed(Duration::from_millis(20)),
//!         outcome: OutcomePolicy { success_bias: 1.0 },
//!         horizon_margin: Duration::from_millis(50),
//!         ..SimConfig::default()
//!     };
//!     let dispatcher = Dispatcher::new(
//!         cfg,
//!         Roster::new(["alpha", "beta", "gamma"]),
//!         Vec::new(), // no subscribers; poll snapshots instead
//!     );
//!
//!     dispatcher
//!         .start("0912 345 6789", Duration::from_millis(10))
//!         .expect("fresh dispatcher accepts a valid target");
//!
//!     dispatcher.wait_idle().await;
//!
//!     // Three settles plus the completion entry, in seq order.
//!     let journal = dispatcher.journal();
//!     assert_eq!(journal.len(), 4);
//!     assert!(!dispatcher.is_active());
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod msisdn;
mod policies;
mod roster;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Dispatcher, RunInfo, Tally, TaskState};
pub use config::SimConfig;
pub use error::{MsisdnError, StartError};
pub use events::{Event, EventKind};
pub use msisdn::Msisdn;
pub use policies::{OutcomePolicy, TaskOutcome, WorkPolicy};
pub use roster::{Roster, ServiceId};
pub use subscribers::{Subscribe, SubscriberReport, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
