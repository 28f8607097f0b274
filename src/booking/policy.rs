//! Attempt budget and pacing for the booking loop

use std::time::Duration;

use crate::config::Config;

/// How many polling attempts a run makes and how long it waits between them
///
/// The delay is fixed rather than exponential: the booking window opens at a
/// known instant and competitors poll at a steady pace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptPolicy {
    /// Maximum number of polling attempts
    pub max_attempts: u32,

    /// Pause after a failed attempt
    pub delay: Duration,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            delay: Duration::from_secs(15),
        }
    }
}

impl AttemptPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Policy from the booking section of the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.booking.max_attempts, config.attempt_delay())
    }

    /// Whether to pause after `attempt` (1-based) failed
    ///
    /// No pause follows the last attempt.
    pub fn pauses_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Worst-case time spent sleeping in one run
    ///
    /// `None` when the total does not fit in a `Duration`.
    pub fn total_wait(&self) -> Option<Duration> {
        self.delay.checked_mul(self.max_attempts.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = AttemptPolicy::default();
        assert_eq!(policy.max_attempts, 8);
        assert_eq!(policy.total_wait(), Some(Duration::from_secs(105)));
    }

    #[test]
    fn test_pauses_between_attempts_only() {
        let policy = AttemptPolicy::new(3, Duration::from_secs(1));
        assert!(policy.pauses_after(1));
        assert!(policy.pauses_after(2));
        assert!(!policy.pauses_after(3));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.booking.max_attempts = 2;
        config.booking.attempt_delay_secs = 4;

        let policy = AttemptPolicy::from_config(&config);
        assert_eq!(policy, AttemptPolicy::new(2, Duration::from_secs(4)));
    }

    #[test]
    fn test_single_attempt_never_waits() {
        let policy = AttemptPolicy::new(1, Duration::from_secs(60));
        assert_eq!(policy.total_wait(), Some(Duration::ZERO));
        assert!(!policy.pauses_after(1));
    }

    #[test]
    fn test_total_wait_overflow() {
        let policy = AttemptPolicy::new(3, Duration::from_secs(u64::MAX));
        assert_eq!(policy.total_wait(), None);
    }
}
