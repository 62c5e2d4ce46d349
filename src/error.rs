//! Error types raised at the dispatch boundary.
//!
//! Two things can be refused when a run is requested: the target number
//! does not parse ([`MsisdnError`]) or a run is already in flight
//! ([`StartError::AlreadyActive`]). Simulated per-task failures are not
//! errors; they are ordinary outcomes recorded in the journal.

use thiserror::Error;

/// The raw target string does not match any accepted mobile-number shape.
///
/// Accepted shapes, after stripping whitespace: `+989XXXXXXXXX`,
/// `989XXXXXXXXX`, `09XXXXXXXXX`, `9XXXXXXXXX`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unrecognized mobile number: expected +989XXXXXXXXX, 989XXXXXXXXX, 09XXXXXXXXX or 9XXXXXXXXX")]
pub struct MsisdnError;

/// Errors produced when a start request is refused.
///
/// A refused start leaves the dispatcher untouched: no journal reset,
/// no state changes, no timers armed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    /// A dispatch run is already active; stop it before starting another.
    #[error("a dispatch run is already active")]
    AlreadyActive,

    /// The target number failed validation.
    #[error(transparent)]
    InvalidTarget(#[from] MsisdnError),
}

impl StartError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use salvosim::StartError;
    ///
    /// assert_eq!(StartError::AlreadyActive.as_label(), "start_already_active");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::AlreadyActive => "start_already_active",
            StartError::InvalidTarget(_) => "start_invalid_target",
        }
    }

    /// Returns a human-readable message suitable for an operator.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
