//! Delay policies deciding whether and when to retry.
//!
//! A policy is driven in a fixed protocol:
//!
//! 1. [`advance`](RetryPolicy::advance) before every attempt, the first one
//!    included. `false` means the retry budget is spent.
//! 2. [`delay`](RetryPolicy::delay) exactly once after each failed attempt
//!    whose `advance` returned `true`. It yields how long to wait before the
//!    next attempt; zero means "don't wait", and the last permitted attempt
//!    always gets zero.
//! 3. [`reset`](RetryPolicy::reset) to reuse the policy for an unrelated
//!    retry session.
//!
//! The retry driver depends on this trait only, so any policy can be
//! substituted:
//!
//! - [`DecorrelatedJitter`]: randomized delays drawn between the base delay
//!   and three times the previous delay, capped.
//! - [`ScheduledBackoff`]: deterministic constant, linear, exponential or
//!   Fibonacci delays.
//!
//! # Examples
//!
//! ```rust
//! use decorr_backoff::{Config, DecorrelatedJitter, RetryPolicy};
//!
//! let mut policy = DecorrelatedJitter::seeded(Config::new().with_max_retries(2), 1);
//!
//! let mut attempts = 0;
//! while policy.advance() {
//!     attempts += 1;
//!     let _wait = policy.delay();
//! }
//! assert_eq!(attempts, 3);
//! ```

mod decorrelated;
mod schedule;

use std::time::Duration;

pub use decorrelated::DecorrelatedJitter;
pub use schedule::{Schedule, ScheduledBackoff};

/// The three-operation contract between a delay policy and the retry driver.
///
/// Implementations mutate their state in place and are meant to be owned by
/// one retry session at a time.
pub trait RetryPolicy {
    /// Move to the next attempt.
    ///
    /// Returns `true` while another attempt (including the very first) is
    /// permitted, `false` once the budget is exhausted.
    fn advance(&mut self) -> bool;

    /// Wait duration before the next attempt.
    ///
    /// Must be called at most once per `true` from [`advance`](Self::advance).
    /// Returns zero for the last permitted attempt.
    fn delay(&mut self) -> Duration;

    /// Return to the initial state for reuse.
    fn reset(&mut self);
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for &mut P {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn delay(&mut self) -> Duration {
        (**self).delay()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for Box<P> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn delay(&mut self) -> Duration {
        (**self).delay()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
