//! Randomized simulation policies.
//!
//! This module groups the knobs that control **how long** a simulated send
//! appears to take and **how** it resolves.
//!
//! ## Contents
//! - [`WorkPolicy`] bounds for the simulated send duration
//! - [`OutcomePolicy`] weighted coin deciding sent vs failed
//! - [`TaskOutcome`] the two ways a launch can settle
//!
//! ## Quick wiring
//! ```text
//! SimConfig { work: WorkPolicy, outcome: OutcomePolicy, .. }
//!      └─► core::launch::Launch uses:
//!           - work.sample() to hold the task in `sending`
//!           - outcome.draw() to settle it as sent or failed
//! ```
//!
//! ## Defaults
//! - `WorkPolicy::default()` → uniform 500ms..=2s.
//! - `OutcomePolicy::default()` → `success_bias = 0.8`.
//!
//! Both policies take an external RNG through `*_with` variants, so tests
//! and deterministic drills can seed their own.

mod outcome;
mod work;

pub use outcome::{OutcomePolicy, TaskOutcome};
pub use work::WorkPolicy;
