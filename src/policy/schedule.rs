//! Deterministic, jitter-free backoff schedules.

use std::time::Duration;

use super::RetryPolicy;
use crate::Config;

/// Growth pattern of a [`ScheduledBackoff`].
///
/// Delays are multiples of the configured base delay
/// ([`Config::multiplier`]) for the 0-based retry index `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Schedule {
    /// Fixed delay: `base`.
    Constant,
    /// Delay increases linearly: `base * (n + 1)`.
    Linear,
    /// Delay doubles: `base * 2^n`.
    #[default]
    Exponential,
    /// Delay follows the Fibonacci sequence: `base * fib(n + 1)`.
    Fibonacci,
}

/// A retry policy with predictable delays.
///
/// Shares the budget and cap of [`Config`] with
/// [`DecorrelatedJitter`](super::DecorrelatedJitter) but computes each delay
/// from the retry index alone. Handy when delays must be exact, and as a
/// drop-in replacement to compare against jittered backoff.
///
/// # Examples
///
/// ```rust
/// use decorr_backoff::{Config, RetryPolicy, Schedule, ScheduledBackoff};
/// use std::time::Duration;
///
/// let config = Config::new()
///     .with_max_retries(4)
///     .with_multiplier(Duration::from_millis(100))
///     .with_max_wait(Duration::from_millis(500));
/// let mut policy = ScheduledBackoff::new(Schedule::Exponential, config);
///
/// let mut delays = Vec::new();
/// while policy.advance() {
///     delays.push(policy.delay());
/// }
///
/// assert_eq!(
///     delays,
///     vec![
///         Duration::from_millis(100),
///         Duration::from_millis(200),
///         Duration::from_millis(400),
///         Duration::from_millis(500), // capped
///         Duration::ZERO,
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledBackoff {
    schedule: Schedule,
    config: Config,
    attempt: u64,
}

impl ScheduledBackoff {
    /// Create a policy following `schedule`.
    pub fn new(schedule: Schedule, config: Config) -> Self {
        Self {
            schedule,
            config,
            attempt: 0,
        }
    }

    /// The growth pattern.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// The configuration this policy was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Delay before retry `retry` (0-indexed), capped, ignoring the budget.
    ///
    /// ```rust
    /// use decorr_backoff::{Config, Schedule, ScheduledBackoff};
    /// use std::time::Duration;
    ///
    /// let config = Config::new().with_multiplier(Duration::from_millis(100));
    /// let policy = ScheduledBackoff::new(Schedule::Fibonacci, config);
    ///
    /// // 100ms, 100ms, 200ms, 300ms, 500ms
    /// assert_eq!(policy.delay_for_retry(0), Duration::from_millis(100));
    /// assert_eq!(policy.delay_for_retry(3), Duration::from_millis(300));
    /// assert_eq!(policy.delay_for_retry(4), Duration::from_millis(500));
    /// ```
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let base = self.config.multiplier();
        let delay = match self.schedule {
            Schedule::Constant => base,
            Schedule::Linear => base.saturating_mul(retry.saturating_add(1)),
            Schedule::Exponential => base.saturating_mul(2u32.saturating_pow(retry)),
            Schedule::Fibonacci => base.saturating_mul(fibonacci(retry.saturating_add(1))),
        };
        delay.min(self.config.max_wait())
    }
}

impl RetryPolicy for ScheduledBackoff {
    fn advance(&mut self) -> bool {
        self.attempt = self.attempt.saturating_add(1);
        self.attempt <= self.config.max_attempts()
    }

    fn delay(&mut self) -> Duration {
        if self.attempt == 0 || self.attempt >= self.config.max_attempts() {
            return Duration::ZERO;
        }
        let retry = u32::try_from(self.attempt - 1).unwrap_or(u32::MAX);
        self.delay_for_retry(retry)
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Calculate the nth Fibonacci number, saturating at `u32::MAX`.
fn fibonacci(n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    let mut a = 0u32;
    let mut b = 1u32;
    for _ in 1..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
        if b == u32::MAX {
            break;
        }
    }
    b
}
