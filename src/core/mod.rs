//! Simulator core: orchestration and run lifecycle.
//!
//! The only public entry point from this module is [`Dispatcher`], plus the
//! value types observers read ([`TaskState`], [`Tally`], [`RunInfo`]).
//!
//! ## Wiring
//! ```text
//!                 ┌────────────────────── Dispatcher ──────────────────────┐
//!                 │  SimConfig   Bus   Arc<StateBoard>   Arc<Journal>      │
//!                 │              Arc<SessionSlot>   Arc<SubscriberSet>     │
//!                 └──────┬──────────────────────────────────────┬──────────┘
//!        start() spawns  │                                      │ listener task
//!                        ▼                                      ▼
//!   launch[0..N] + horizon watchdog                   bus ──► SubscriberSet
//!        │ settle / reset under board lock
//!        ▼
//!   StateBoard + Journal ──► bus ──► Dispatcher::subscribe() receivers
//! ```
//!
//! Internal modules:
//! - `board`: per-service states and the shared write lock;
//! - `launch`: one staggered send task (offset sleep, work sleep, settle);
//! - `cancel`: single teardown path for manual stop and horizon expiry;
//! - `session`: the live run's flag, token and timer handles;
//! - `dispatcher`: public API tying the above together.

mod board;
mod cancel;
mod dispatcher;
mod launch;
mod session;

pub use board::{Tally, TaskState};
pub use dispatcher::Dispatcher;
pub use session::RunInfo;
