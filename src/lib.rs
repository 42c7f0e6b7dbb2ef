//! # decorr-backoff
//!
//! Retry fallible work with decorrelated-jitter backoff.
//!
//! Retrying on a fixed or purely exponential schedule makes independent
//! clients retry in lockstep and hammer a recovering service all at once.
//! Decorrelated jitter draws each delay at random between a base delay and
//! three times the previous delay, so clients spread out while still backing
//! off roughly exponentially. Every delay is capped.
//!
//! The crate has two halves:
//!
//! - **Policies** ([`RetryPolicy`]) decide whether another attempt is allowed
//!   and how long to wait before it. They are plain state machines, fully
//!   deterministic when given a seeded random source.
//! - **The driver** ([`run`], `async` feature) calls your work, consults the
//!   policy after each failure and sleeps between attempts unless a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken) fires.
//!
//! ## Quick Example
//!
//! ```rust
//! use decorr_backoff::{run, Config, DecorrelatedJitter};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let config = Config::new()
//!     .with_max_retries(3)
//!     .with_multiplier(Duration::from_millis(1))
//!     .with_max_wait(Duration::from_millis(10));
//!
//! let result = run(
//!     &CancellationToken::new(),
//!     DecorrelatedJitter::new(config),
//!     |attempt| async move {
//!         if attempt < 3 {
//!             Err("connection refused")
//!         } else {
//!             Ok("connected")
//!         }
//!     },
//! )
//! .await;
//!
//! assert_eq!(result, Ok(Some("connected")));
//! # });
//! ```
//!
//! ## Driving a policy by hand
//!
//! ```rust
//! use decorr_backoff::{Config, DecorrelatedJitter, RetryPolicy};
//! use std::time::Duration;
//!
//! let mut policy = DecorrelatedJitter::seeded(Config::new().with_max_retries(5), 1);
//!
//! for attempt in 1.. {
//!     if !policy.advance() {
//!         break;
//!     }
//!     // ... attempt the work, and on failure:
//!     let wait = policy.delay();
//!     if !wait.is_zero() {
//!         println!("attempt {attempt} failed, retrying in {wait:?}");
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `async` (default): the [`run`] driver, on tokio.
//! - `tracing`: debug events from the driver.
//! - `serde`: (de)serialization of [`Config`], normalizing invalid values.
//! - `proptest`: `Arbitrary` for [`Config`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod policy;
#[cfg(feature = "async")]
pub mod run;
pub mod testing;

// Re-exports
pub use config::{Config, ConfigOverrides, MAX_RETRIES, MAX_WAIT, MULTIPLIER};
pub use policy::{DecorrelatedJitter, RetryPolicy, Schedule, ScheduledBackoff};
#[cfg(feature = "async")]
pub use run::{run, run_with_hooks, RetryEvent};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::policy::{DecorrelatedJitter, RetryPolicy, Schedule, ScheduledBackoff};
    #[cfg(feature = "async")]
    pub use crate::run::{run, run_with_hooks, RetryEvent};
}
