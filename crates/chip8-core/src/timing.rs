//! Scheduler-side pacing helpers.
//!
//! The core never sleeps; hosts use [`Cadence`] to decide how many
//! [`crate::Machine::step`] calls are due for a span of wall-clock time.

use std::time::Duration;

/// Default execution rate in steps per second of emulated time.
pub const DEFAULT_STEPS_PER_SECOND: u32 = 540;

/// A fixed step rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cadence {
    steps_per_second: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
        }
    }
}

impl Cadence {
    /// Builds a cadence; `None` for a zero rate.
    #[must_use]
    pub const fn new(steps_per_second: u32) -> Option<Self> {
        if steps_per_second == 0 {
            None
        } else {
            Some(Self { steps_per_second })
        }
    }

    /// Configured rate.
    #[must_use]
    pub const fn steps_per_second(self) -> u32 {
        self.steps_per_second
    }

    /// Wall-clock time between consecutive steps.
    #[must_use]
    pub fn step_interval(self) -> Duration {
        Duration::from_secs(1) / self.steps_per_second
    }

    /// Whole steps that fit in `elapsed`.
    #[must_use]
    pub fn steps_due(self, elapsed: Duration) -> u64 {
        let due = elapsed.as_nanos() * u128::from(self.steps_per_second) / 1_000_000_000;
        u64::try_from(due).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Cadence, DEFAULT_STEPS_PER_SECOND};

    #[test]
    fn default_rate_matches_reference_system() {
        assert_eq!(Cadence::default().steps_per_second(), DEFAULT_STEPS_PER_SECOND);
        assert_eq!(Cadence::new(0), None);
    }

    #[test]
    fn interval_and_due_steps_agree() {
        let cadence = Cadence::new(500).expect("non-zero");
        assert_eq!(cadence.step_interval(), Duration::from_millis(2));
        assert_eq!(cadence.steps_due(Duration::from_secs(1)), 500);
        assert_eq!(cadence.steps_due(Duration::from_millis(3)), 1);
        assert_eq!(cadence.steps_due(Duration::ZERO), 0);
    }
}
