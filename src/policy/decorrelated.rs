//! Decorrelated-jitter backoff.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::RetryPolicy;
use crate::Config;

/// Backoff with decorrelated jitter.
///
/// Each retry waits a random duration whose range is anchored at the base
/// delay ([`Config::multiplier`]) and bounded by three times the previous
/// delay, capped at [`Config::max_wait`]. Independent clients therefore
/// spread their retries out instead of retrying in lockstep, while the
/// delays still grow roughly exponentially on average.
///
/// The first retry of a session is drawn from `[0, base)`, so it is fast.
/// Every later one is drawn from `[base, max(base, 3 * previous))`.
///
/// The random source is a type parameter: production code uses the
/// OS-seeded default, tests inject a seeded or scripted one. Passing
/// `&mut R` lets several policies borrow one generator in turn.
///
/// # Examples
///
/// ```rust
/// use decorr_backoff::{Config, DecorrelatedJitter, RetryPolicy};
/// use std::time::Duration;
///
/// let config = Config::new()
///     .with_max_retries(5)
///     .with_multiplier(Duration::from_secs(30))
///     .with_max_wait(Duration::from_secs(300));
/// let mut policy = DecorrelatedJitter::seeded(config, 1);
///
/// // Six attempts: the first one and five retries.
/// let mut delays = Vec::new();
/// while policy.advance() {
///     delays.push(policy.delay());
/// }
///
/// assert_eq!(delays.len(), 6);
/// assert!(delays[0] <= Duration::from_secs(30));
/// assert!(delays.iter().all(|d| *d <= Duration::from_secs(300)));
/// assert_eq!(delays[5], Duration::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct DecorrelatedJitter<R = StdRng> {
    config: Config,
    rng: R,
    attempt: u64,
    /// Last non-zero delay of the session.
    previous: Duration,
}

impl DecorrelatedJitter<StdRng> {
    /// Create a policy using an OS-seeded generator.
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a policy whose delays are reproducible from `seed`.
    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for DecorrelatedJitter<StdRng> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<R: RngCore> DecorrelatedJitter<R> {
    /// Create a policy drawing from the given random source.
    pub fn with_rng(config: Config, rng: R) -> Self {
        Self {
            config,
            rng,
            attempt: 0,
            previous: Duration::ZERO,
        }
    }

    /// The configuration this policy was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of `advance` calls since construction or the last reset.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// The last non-zero delay handed out, zero before the first one.
    pub fn previous_delay(&self) -> Duration {
        self.previous
    }

    /// Take back the random source.
    pub fn into_rng(self) -> R {
        self.rng
    }

    fn next_delay(&mut self) -> Duration {
        let base = self.config.multiplier();
        let (low, high) = if self.previous.is_zero() {
            (Duration::ZERO, base)
        } else {
            (base, base.max(self.previous.saturating_mul(3)))
        };

        let u: f64 = self.rng.random();
        let range = high - low;
        let offset = Duration::try_from_secs_f64(u * range.as_secs_f64()).unwrap_or(range);
        let candidate = low.saturating_add(offset).min(high);

        let delay = candidate.min(self.config.max_wait());
        if !delay.is_zero() {
            self.previous = delay;
        }
        delay
    }
}

impl<R: RngCore> RetryPolicy for DecorrelatedJitter<R> {
    fn advance(&mut self) -> bool {
        self.attempt = self.attempt.saturating_add(1);
        self.attempt <= self.config.max_attempts()
    }

    fn delay(&mut self) -> Duration {
        // Nothing follows the last attempt, so there is nothing to wait for.
        if self.attempt == 0 || self.attempt >= self.config.max_attempts() {
            return Duration::ZERO;
        }
        self.next_delay()
    }

    fn reset(&mut self) {
        self.attempt = 0;
        self.previous = Duration::ZERO;
    }
}
