//! # Outcome policy for simulated sends.
//!
//! Every launch settles by drawing from a weighted coin: with probability
//! `success_bias` the task resolves as [`TaskOutcome::Sent`], otherwise as
//! [`TaskOutcome::Failed`]. A bias of `1.0` or `0.0` makes runs fully
//! deterministic, which the demos and tests rely on.

use rand::Rng;

/// How a single simulated send resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The simulated gateway accepted the message.
    Sent,
    /// The simulated gateway rejected the message.
    Failed,
}

impl TaskOutcome {
    /// Short stable label for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskOutcome::Sent => "sent",
            TaskOutcome::Failed => "failed",
        }
    }
}

/// Weighted-coin policy deciding how launches settle.
///
/// `success_bias` is clamped to `[0.0, 1.0]` at draw time; values that are
/// not a number count as zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutcomePolicy {
    /// Probability that a launch settles as [`TaskOutcome::Sent`].
    pub success_bias: f64,
}

impl Default for OutcomePolicy {
    /// Returns the stock bias: 80% sent, 20% failed.
    fn default() -> Self {
        Self { success_bias: 0.8 }
    }
}

impl OutcomePolicy {
    /// Draws one outcome using the thread-local RNG.
    pub fn draw(&self) -> TaskOutcome {
        self.draw_with(&mut rand::rng())
    }

    /// Draws one outcome from the supplied RNG.
    ///
    /// Degenerate biases short-circuit without consuming randomness, so a
    /// bias of exactly `0.0` or `1.0` is deterministic on any RNG.
    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> TaskOutcome {
        // NaN fails the first comparison and lands on Failed.
        if !(self.success_bias > 0.0) {
            return TaskOutcome::Failed;
        }
        if self.success_bias >= 1.0 {
            return TaskOutcome::Sent;
        }
        if rng.random_bool(self.success_bias) {
            TaskOutcome::Sent
        } else {
            TaskOutcome::Failed
        }
    }
}
