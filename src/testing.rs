//! Testing utilities for code built on this crate.
//!
//! Backoff delays are random, which makes exact assertions awkward. The
//! policies here accept any [`RngCore`], so tests can swap the random source
//! for a seeded generator or for a [`SequenceRng`] that replays scripted
//! uniform draws.
//!
//! # Examples
//!
//! ```rust
//! use decorr_backoff::testing::SequenceRng;
//! use decorr_backoff::{Config, DecorrelatedJitter, RetryPolicy};
//! use std::time::Duration;
//!
//! let config = Config::new()
//!     .with_max_retries(2)
//!     .with_multiplier(Duration::from_secs(1));
//! let mut policy = DecorrelatedJitter::with_rng(config, SequenceRng::new([0.5]));
//!
//! assert!(policy.advance());
//! assert_eq!(policy.delay(), Duration::from_millis(500));
//! ```
//!
//! With the `proptest` feature enabled, [`Config`](crate::Config) implements
//! `proptest::arbitrary::Arbitrary`, generating arbitrary (normalized)
//! configurations.

use rand::RngCore;

/// A random source replaying a fixed script of uniform draws.
///
/// Each value is what `rng.random::<f64>()` yields for that draw. Values are
/// clamped into `[0, 1)` and the script repeats once exhausted. An empty
/// script always yields `0.0`. The number of draws taken so far is tracked,
/// which lets tests assert that no randomness was consumed.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    script: Vec<f64>,
    draws: usize,
}

/// Number of mantissa bits `rand` uses when mapping a `u64` onto `[0, 1)`.
const F64_PRECISION: u32 = 53;

impl SequenceRng {
    /// Create a source replaying `script` in order.
    pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: script.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of 64-bit draws taken so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    fn next_uniform(&mut self) -> f64 {
        let value = if self.script.is_empty() {
            0.0
        } else {
            self.script[self.draws % self.script.len()]
        };
        self.draws += 1;
        value
    }
}

impl RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        // rand maps a u64 to [0, 1) by keeping the top 53 bits and scaling by
        // 2^-53, so place the scripted fraction in exactly those bits.
        let scale = (1u64 << F64_PRECISION) as f64;
        let max_fraction = (1u64 << F64_PRECISION) - 1;
        let uniform = self.next_uniform();
        let fraction = if uniform.is_nan() || uniform <= 0.0 {
            0
        } else {
            ((uniform * scale) as u64).min(max_fraction)
        };
        fraction << (64 - F64_PRECISION)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
