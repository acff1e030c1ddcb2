use std::time::Duration;

/// Backoff schedule for model calls.
///
/// The router asks `delay_before(attempt)` for the pause preceding each
/// attempt, so swapping a fixed schedule for an exponential one never
/// changes a call site, and tests can inspect the schedule without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    exponential: bool,
}

impl RetryPolicy {
    /// Same delay before every attempt after the first.
    #[must_use]
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay, exponential: false }
    }

    /// Base delay doubling with each attempt after the first.
    #[must_use]
    pub const fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts, delay: base_delay, exponential: true }
    }

    /// A single attempt, no waiting.
    #[must_use]
    pub const fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Total attempts the router may make, at least one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pause before the given 1-based attempt. The first attempt never
    /// waits; later attempts wait per the schedule.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            return None;
        }
        if self.exponential {
            let factor = 2u32.saturating_pow(attempt.saturating_sub(2));
            Some(self.delay.saturating_mul(factor))
        } else {
            Some(self.delay)
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, five seconds apart.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(5))
    }
}
