//! # Work policy for simulated send durations.
//!
//! [`WorkPolicy`] bounds how long a launched task sits in `sending` before
//! it settles. Durations are sampled uniformly in whole milliseconds from
//! `min..=max`; a zero-width window makes every task take exactly the same
//! time, which keeps demo runs reproducible.

use rand::Rng;
use std::time::Duration;

/// Inclusive bounds for the simulated per-task send duration.
///
/// If `max < min` the bounds are swapped at sample time rather than
/// rejected, so any pair of durations is usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkPolicy {
    /// Shortest simulated send.
    pub min: Duration,
    /// Longest simulated send.
    pub max: Duration,
}

impl Default for WorkPolicy {
    /// Returns the stock window: 500ms..=2s.
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_secs(2),
        }
    }
}

impl WorkPolicy {
    /// A zero-width window: every task takes exactly `d`.
    pub fn fixed(d: Duration) -> Self {
        Self { min: d, max: d }
    }

    /// Longest duration a task can spend in `sending`.
    ///
    /// The auto-stop horizon is derived from this bound.
    pub fn worst_case(&self) -> Duration {
        self.min.max(self.max)
    }

    /// Samples one send duration using the thread-local RNG.
    pub fn sample(&self) -> Duration {
        self.sample_with(&mut rand::rng())
    }

    /// Samples one send duration from the supplied RNG.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min.min(self.max).as_millis() as u64;
        let hi = self.min.max(self.max).as_millis() as u64;
        if lo >= hi {
            return Duration::from_millis(hi);
        }
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_window_always_returns_same_duration() {
        let policy = WorkPolicy::fixed(Duration::from_millis(300));
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(policy.sample_with(&mut rng), Duration::from_millis(300));
        }
    }

    #[test]
    fn test_samples_stay_within_bounds() {
        let policy = WorkPolicy {
            min: Duration::from_millis(100),
            max: Duration::from_millis(400),
        };
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let d = policy.sample_with(&mut rng);
            assert!(
                (Duration::from_millis(100)..=Duration::from_millis(400)).contains(&d),
                "sample {d:?} escaped the window"
            );
        }
    }

    #[test]
    fn test_swapped_bounds_are_normalized() {
        let policy = WorkPolicy {
            min: Duration::from_millis(400),
            max: Duration::from_millis(100),
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let d = policy.sample_with(&mut rng);
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(400));
        }
        assert_eq!(policy.worst_case(), Duration::from_millis(400));
    }

    #[test]
    fn test_zero_window() {
        let policy = WorkPolicy::fixed(Duration::ZERO);
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(policy.sample_with(&mut rng), Duration::ZERO);
        assert_eq!(policy.worst_case(), Duration::ZERO);
    }

    #[test]
    fn test_default_window() {
        let policy = WorkPolicy::default();
        assert_eq!(policy.min, Duration::from_millis(500));
        assert_eq!(policy.max, Duration::from_secs(2));
        assert_eq!(policy.worst_case(), Duration::from_secs(2));
    }
}
