//! Engine configuration
//!
//! Poll pacing for the approval poller. Intervals are configurable so the
//! CLI can trade latency against request volume on the remote service.

use std::time::Duration;

use crate::error::EngineError;

/// Default upper bound on how long to wait for an approval checkpoint
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10 * 60 * 60);

const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
const MAX_BACKOFF_FACTOR: f64 = 10.0;

/// Delay-then-retry policy between timeline fetches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// Delay before the second fetch
    pub interval: Duration,

    /// Upper bound for the delay once backoff kicks in
    pub max_interval: Duration,

    /// Multiplier applied to the delay after every empty round (1.0 = fixed)
    pub backoff_factor: f64,
}

impl PollPolicy {
    /// Fixed-interval policy
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_interval: interval.max(DEFAULT_MAX_INTERVAL),
            backoff_factor: 1.0,
        }
    }

    /// Grows the delay by `factor` per round, capped at `max_interval`
    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval = max_interval;
        self
    }

    /// Delay to use after a round that waited `current`
    ///
    /// A product too large for a `Duration` saturates at `max_interval`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        if self.backoff_factor <= 1.0 {
            return current;
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
    }

    /// Validates the policy
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.interval.is_zero() {
            return Err(EngineError::InvalidPolicy(
                "interval must be greater than 0".to_string(),
            ));
        }

        if !(1.0..=MAX_BACKOFF_FACTOR).contains(&self.backoff_factor) {
            return Err(EngineError::InvalidPolicy(format!(
                "backoff factor must be between 1.0 and {}",
                MAX_BACKOFF_FACTOR
            )));
        }

        if self.max_interval < self.interval {
            return Err(EngineError::InvalidPolicy(
                "max interval must not be shorter than the interval".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.backoff_factor, 1.0);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_fixed_interval_does_not_grow() {
        let policy = PollPolicy::new(Duration::from_secs(2));
        assert_eq!(
            policy.next_interval(Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy =
            PollPolicy::new(Duration::from_secs(1)).with_backoff(2.0, Duration::from_secs(5));

        let mut delay = policy.interval;
        let mut seen = Vec::new();
        for _ in 0..5 {
            delay = policy.next_interval(delay);
            seen.push(delay.as_secs());
        }

        assert_eq!(seen, vec![2, 4, 5, 5, 5]);
    }

    #[test]
    fn test_backoff_saturates_on_huge_intervals() {
        let interval = Duration::from_secs(u64::MAX / 2);
        let policy = PollPolicy::new(interval).with_backoff(3.0, Duration::MAX);
        assert!(policy.validate().is_ok());

        assert_eq!(policy.next_interval(interval), Duration::MAX);

        let capped = PollPolicy::new(interval).with_backoff(10.0, interval);
        assert_eq!(capped.next_interval(interval), interval);
    }

    #[test]
    fn test_policy_validation() {
        let mut policy = PollPolicy::default();
        assert!(policy.validate().is_ok());

        policy.interval = Duration::ZERO;
        assert!(policy.validate().is_err());

        policy.interval = Duration::from_secs(5);
        policy.backoff_factor = 0.5;
        assert!(policy.validate().is_err());

        policy.backoff_factor = f64::NAN;
        assert!(policy.validate().is_err());

        policy.backoff_factor = 1.5;
        policy.max_interval = Duration::from_secs(1);
        assert!(policy.validate().is_err());
    }
}
