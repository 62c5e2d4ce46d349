//! # Event subscribers for dispatch observability.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`]
//! fan-out, and the built-in [`LogWriter`] (behind the `logging` feature)
//! for handling events broadcast through the bus.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   launch / stop ── publish(Event) ──► Bus ──► subscriber listener
//!                                                     │
//!                                                SubscriberSet::emit
//!                                                     │
//!                                        ┌────────────┼────────────┐
//!                                        ▼            ▼            ▼
//!                                    LogWriter      Custom       Custom
//!                                   (lane+worker) (lane+worker) (lane+worker)
//! ```
//!
//! Lanes are bounded queues sized by `SimConfig::subscriber_queue`; an event
//! that finds a lane full is shed for that subscriber and counted. Shed and
//! panic tallies are exposed per subscriber through
//! `Dispatcher::subscriber_report`.
//!
//! Subscribers observe; they cannot steer the run. Anything that needs to
//! stop a run goes through `Dispatcher::stop`.

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::{SubscriberReport, SubscriberSet};
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
