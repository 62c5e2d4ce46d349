//! Dispatch events: types, broadcast bus, and the run journal.
//!
//! This module groups the event **data model**, the **bus** used to push
//! events to observers as they happen, and the **journal** that keeps the
//! ordered record of a run.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//! - `Journal` append-only, sequence-stamped entry list
//!
//! ## Quick reference
//! - **Publishers**: launch tasks (launched + settled), the stop path and
//!   the horizon watchdog (run-level events).
//! - **Consumers**: `Dispatcher::subscribe()` receivers and the subscriber
//!   listener that fans out to `SubscriberSet`.
//!
//! See `core/mod.rs` for the system-level wiring diagram.

mod bus;
mod event;
mod journal;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub(crate) use journal::Journal;
