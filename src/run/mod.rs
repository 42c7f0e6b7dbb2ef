//! The retry driver.
//!
//! [`run`] calls a fallible operation until it succeeds, the policy's budget
//! runs out, or a [`CancellationToken`] fires while waiting between attempts.
//!
//! Attempts are strictly sequential. The driver only suspends between
//! attempts, never while `work` is running, and it never interrupts `work`:
//! operations that must observe cancellation while in flight should watch
//! the token themselves.
//!
//! # Return value
//!
//! - `Ok(Some(value))` when an attempt succeeds.
//! - `Err(error)` with the error of the last attempt when the budget is
//!   exhausted **or** when cancellation interrupted a wait. Cancellation has
//!   no error of its own; check [`CancellationToken::is_cancelled`] after
//!   `run` returns to tell the two apart.
//! - `Ok(None)` when the policy permitted no attempt at all.
//!
//! # Examples
//!
//! ```rust
//! use decorr_backoff::{run, Config, DecorrelatedJitter};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let policy = DecorrelatedJitter::seeded(
//!     Config::new()
//!         .with_max_retries(1)
//!         .with_multiplier(Duration::from_millis(1)),
//!     1,
//! );
//!
//! let result = run(&CancellationToken::new(), policy, |attempt| async move {
//!     println!("{attempt} attempt");
//!     Err::<(), _>("timeout")
//! })
//! .await;
//!
//! assert_eq!(result, Err("timeout"));
//! # });
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::policy::RetryPolicy;

/// Information about a failed attempt, passed to hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Wait before the next attempt; zero when retrying immediately or when
    /// no attempt follows.
    pub delay: Duration,
    /// Time elapsed since the first attempt started.
    pub elapsed: Duration,
}

/// Retry `work` under `policy` until it succeeds, the budget is exhausted,
/// or `cancel` fires during a wait.
///
/// `work` receives the 1-based attempt number. The policy may be passed by
/// value or as `&mut policy` to keep using it afterwards.
///
/// See the [module documentation](self) for the return value.
pub async fn run<P, F, Fut, T, E>(cancel: &CancellationToken, policy: P, work: F) -> Result<Option<T>, E>
where
    P: RetryPolicy,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run_with_hooks(cancel, policy, work, |_: &RetryEvent<'_, E>| {}).await
}

/// Like [`run`], calling `on_retry` after every failed attempt.
///
/// The hook runs before the driver waits, so it sees the delay about to be
/// slept. It is synchronous and should not block; use it for logging or
/// metrics.
///
/// # Examples
///
/// ```rust
/// use decorr_backoff::{run_with_hooks, Config, RetryEvent, Schedule, ScheduledBackoff};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let policy = ScheduledBackoff::new(
///     Schedule::Constant,
///     Config::new()
///         .with_max_retries(2)
///         .with_multiplier(Duration::from_millis(1)),
/// );
///
/// let mut seen = Vec::new();
/// let result = run_with_hooks(
///     &CancellationToken::new(),
///     policy,
///     |attempt| async move { if attempt < 3 { Err("busy") } else { Ok(attempt) } },
///     |event: &RetryEvent<'_, &str>| seen.push((event.attempt, event.delay)),
/// )
/// .await;
///
/// assert_eq!(result, Ok(Some(3)));
/// assert_eq!(
///     seen,
///     vec![(1, Duration::from_millis(1)), (2, Duration::from_millis(1))]
/// );
/// # });
/// ```
pub async fn run_with_hooks<P, F, Fut, T, E, H>(
    cancel: &CancellationToken,
    mut policy: P,
    mut work: F,
    mut on_retry: H,
) -> Result<Option<T>, E>
where
    P: RetryPolicy,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    H: FnMut(&RetryEvent<'_, E>),
{
    let start = Instant::now();
    let mut attempt = 0u32;
    let mut last_error = None;

    while policy.advance() {
        attempt = attempt.saturating_add(1);

        let error = match work(attempt).await {
            Ok(value) => return Ok(Some(value)),
            Err(error) => error,
        };

        let delay = policy.delay();
        on_retry(&RetryEvent {
            attempt,
            error: &error,
            delay,
            elapsed: start.elapsed(),
        });
        last_error = Some(error);

        #[cfg(feature = "tracing")]
        tracing::debug!(attempt, ?delay, "attempt failed");

        if !delay.is_zero() && !wait(cancel, delay).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, "retry wait cancelled");
            break;
        }
    }

    match last_error {
        Some(error) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempts = attempt,
                elapsed = ?start.elapsed(),
                "giving up"
            );
            Err(error)
        }
        None => Ok(None),
    }
}

/// Sleep for `delay` unless `cancel` fires first.
///
/// Returns `false` when cancelled. The sleep is dropped either way, so no
/// timer outlives the wait.
async fn wait(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
