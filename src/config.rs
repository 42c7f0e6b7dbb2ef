//! Backoff configuration.
//!
//! A [`Config`] is an immutable set of tunables shared by every policy in this
//! crate. It can only be built through methods that normalize their input, so a
//! `Config` is never invalid: a negative retry count or a zero duration is
//! replaced by the documented default instead of being rejected.
//!
//! # Examples
//!
//! ```rust
//! use decorr_backoff::Config;
//! use std::time::Duration;
//!
//! let config = Config::new()
//!     .with_max_retries(5)
//!     .with_multiplier(Duration::from_secs(30))
//!     .with_max_wait(Duration::from_secs(300));
//!
//! assert_eq!(config.max_retries(), 5);
//! assert_eq!(config.max_attempts(), 6);
//!
//! // Invalid input falls back to the defaults.
//! let config = Config::new()
//!     .with_max_retries(-1)
//!     .with_multiplier(Duration::ZERO);
//!
//! assert_eq!(config, Config::default());
//! ```

use std::time::Duration;

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 10;

/// Default base delay, the multiplier that grows the wait interval.
pub const MULTIPLIER: Duration = Duration::from_millis(25);

/// Default cap on a single delay.
pub const MAX_WAIT: Duration = Duration::from_secs(20);

/// Validated backoff tunables.
///
/// Construct with [`Config::new`] (or [`Default`]) and refine with the
/// `with_*` methods. Later calls for the same field override earlier ones;
/// there is no cross-field validation, so a cap below the base delay is
/// allowed and simply saturates every computed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ConfigOverrides"))]
pub struct Config {
    max_retries: u32,
    multiplier: Duration,
    max_wait: Duration,
}

impl Config {
    /// Create a configuration holding the defaults
    /// ([`MAX_RETRIES`], [`MULTIPLIER`], [`MAX_WAIT`]).
    pub const fn new() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            multiplier: MULTIPLIER,
            max_wait: MAX_WAIT,
        }
    }

    /// Set how many times failed work is retried after the first attempt.
    ///
    /// Negative values restore [`MAX_RETRIES`]. Values beyond `u32::MAX`
    /// are clamped.
    ///
    /// ```rust
    /// use decorr_backoff::{Config, MAX_RETRIES};
    ///
    /// assert_eq!(Config::new().with_max_retries(0).max_retries(), 0);
    /// assert_eq!(Config::new().with_max_retries(-3).max_retries(), MAX_RETRIES);
    /// ```
    pub fn with_max_retries(mut self, n: i64) -> Self {
        self.max_retries = if n < 0 {
            MAX_RETRIES
        } else {
            u32::try_from(n).unwrap_or(u32::MAX)
        };
        self
    }

    /// Set the base delay.
    ///
    /// It is the lower bound of the jitter range and the starting point of
    /// the delay recurrence. A zero duration restores [`MULTIPLIER`].
    pub fn with_multiplier(mut self, d: Duration) -> Self {
        self.multiplier = if d.is_zero() { MULTIPLIER } else { d };
        self
    }

    /// Set the upper limit on a single wait between attempts.
    ///
    /// A zero duration restores [`MAX_WAIT`].
    pub fn with_max_wait(mut self, d: Duration) -> Self {
        self.max_wait = if d.is_zero() { MAX_WAIT } else { d };
        self
    }

    /// Apply a set of optional overrides.
    ///
    /// Fields left as `None` keep their current value.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(n) = overrides.max_retries {
            self = self.with_max_retries(n);
        }
        if let Some(d) = overrides.multiplier {
            self = self.with_multiplier(d);
        }
        if let Some(d) = overrides.max_wait {
            self = self.with_max_wait(d);
        }
        self
    }

    /// Retries permitted after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts permitted, the first one included.
    pub fn max_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }

    /// Base delay of the backoff.
    pub fn multiplier(&self) -> Duration {
        self.multiplier
    }

    /// Cap on any single computed delay.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional overrides for a [`Config`].
///
/// Useful when tunables come from an outer configuration layer where each
/// one may be absent. Under the `serde` feature this is also the wire shape
/// of [`Config`], so deserialized configurations get the same default
/// substitution as the builder methods.
///
/// ```rust
/// use decorr_backoff::{Config, ConfigOverrides};
/// use std::time::Duration;
///
/// let overrides = ConfigOverrides {
///     max_wait: Some(Duration::from_secs(1)),
///     ..ConfigOverrides::default()
/// };
///
/// let config = Config::from(overrides);
/// assert_eq!(config.max_wait(), Duration::from_secs(1));
/// assert_eq!(config.max_retries(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConfigOverrides {
    /// Retries after the first attempt; negative means default.
    pub max_retries: Option<i64>,
    /// Base delay; zero means default.
    pub multiplier: Option<Duration>,
    /// Delay cap; zero means default.
    pub max_wait: Option<Duration>,
}

impl From<ConfigOverrides> for Config {
    fn from(overrides: ConfigOverrides) -> Self {
        Config::new().apply(overrides)
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for Config {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (-2i64..64, 0u64..=60_000, 0u64..=600_000)
            .prop_map(|(retries, multiplier_ms, max_wait_ms)| {
                Config::new()
                    .with_max_retries(retries)
                    .with_multiplier(Duration::from_millis(multiplier_ms))
                    .with_max_wait(Duration::from_millis(max_wait_ms))
            })
            .boxed()
    }
}
