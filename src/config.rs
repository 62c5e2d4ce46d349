//! # Global simulator configuration.
//!
//! [`SimConfig`] defines a dispatcher's behavior: the fallback launch
//! interval, the simulated work window, the success bias of outcomes,
//! the horizon safety margin, and channel capacities for the bus and
//! subscriber queues.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use salvosim::{SimConfig, OutcomePolicy, WorkPolicy};
//!
//! let mut cfg = SimConfig::default();
//! cfg.work = WorkPolicy::fixed(Duration::from_millis(250));
//! cfg.outcome = OutcomePolicy { success_bias: 1.0 };
//!
//! assert_eq!(cfg.interval_from_input("1.5"), Duration::from_millis(1500));
//! assert_eq!(cfg.interval_from_input("bogus"), cfg.default_interval);
//! ```

use std::time::Duration;

use crate::policies::{OutcomePolicy, WorkPolicy};

/// Global configuration for a dispatcher.
///
/// Controls interval parsing fallback, simulated work bounds, outcome bias,
/// horizon margin, and channel sizing.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Launch interval used when the raw interval input does not parse.
    pub default_interval: Duration,
    /// Bounds for the simulated per-task send duration.
    pub work: WorkPolicy,
    /// Probability weighting for simulated task outcomes.
    pub outcome: OutcomePolicy,
    /// Slack added to the auto-stop horizon after the last possible settle.
    pub horizon_margin: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Capacity of each subscriber's delivery queue.
    pub subscriber_queue: usize,
}

impl Default for SimConfig {
    /// Provides a default configuration:
    /// - `default_interval = 100ms`
    /// - `work = WorkPolicy::default()` (500ms..=2s)
    /// - `outcome = OutcomePolicy::default()` (80% sent)
    /// - `horizon_margin = 500ms`
    /// - `bus_capacity = 1024`
    /// - `subscriber_queue = 256`
    fn default() -> Self {
        Self {
            default_interval: Duration::from_millis(100),
            work: WorkPolicy::default(),
            outcome: OutcomePolicy::default(),
            horizon_margin: Duration::from_millis(500),
            bus_capacity: 1024,
            subscriber_queue: 256,
        }
    }
}

impl SimConfig {
    /// Parses a raw interval string (seconds, decimals allowed) from the
    /// operator, falling back to [`default_interval`](Self::default_interval).
    ///
    /// Falls back on anything that is not a finite, non-negative number
    /// representable as a `Duration`. `"0"` is accepted and means launch
    /// everything at once.
    pub fn interval_from_input(&self, raw: &str) -> Duration {
        match raw.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => {
                Duration::try_from_secs_f64(secs).unwrap_or(self.default_interval)
            }
            _ => self.default_interval,
        }
    }

    /// Bus capacity with a floor of 1 (zero would make `broadcast` panic).
    #[inline]
    pub(crate) fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}
