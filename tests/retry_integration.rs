//! Integration tests for retrying work through the public API.
#![cfg(feature = "async")]

use decorr_backoff::{run, run_with_hooks, Config, DecorrelatedJitter, RetryEvent};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
enum ServiceError {
    Unavailable,
}

/// A service that fails a fixed number of times before recovering.
struct FlakyService {
    failures_left: AtomicU32,
    calls: AtomicU32,
}

impl FlakyService {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        })
    }

    async fn call(&self) -> Result<&'static str, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            Err(ServiceError::Unavailable)
        } else {
            Ok("pong")
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_recovers_within_default_budget() {
    let service = FlakyService::new(4);

    let result = run(
        &CancellationToken::new(),
        DecorrelatedJitter::seeded(Config::default(), 7),
        |_| {
            let service = service.clone();
            async move { service.call().await }
        },
    )
    .await;

    assert_eq!(result, Ok(Some("pong")));
    assert_eq!(service.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_budget() {
    let service = FlakyService::new(u32::MAX);

    let result = run(
        &CancellationToken::new(),
        DecorrelatedJitter::seeded(Config::new().with_max_retries(3), 7),
        |_| {
            let service = service.clone();
            async move { service.call().await }
        },
    )
    .await;

    assert_eq!(result, Err(ServiceError::Unavailable));
    assert_eq!(service.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_is_observed_through_the_token() {
    let service = FlakyService::new(u32::MAX);
    let cancel = CancellationToken::new();
    let config = Config::new()
        .with_max_retries(10)
        .with_multiplier(Duration::from_secs(1))
        .with_max_wait(Duration::from_secs(30));

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            cancel.cancel();
        });
    }

    let start = tokio::time::Instant::now();
    let result = run(&cancel, DecorrelatedJitter::seeded(config, 3), |_| {
        let service = service.clone();
        async move { service.call().await }
    })
    .await;

    // Same error as exhaustion; the token tells the two apart.
    assert_eq!(result, Err(ServiceError::Unavailable));
    assert!(cancel.is_cancelled());
    let calls = service.calls.load(Ordering::SeqCst);
    assert!((1..11).contains(&calls), "{calls} calls");

    // The paused clock stops where the token fired, not after the budget.
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_secs(5) && elapsed <= Duration::from_millis(5_002),
        "elapsed {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_hook_delays_respect_policy_bounds() {
    let config = Config::new()
        .with_max_retries(6)
        .with_multiplier(Duration::from_millis(50))
        .with_max_wait(Duration::from_millis(400));
    let mut delays = Vec::new();

    let result = run_with_hooks(
        &CancellationToken::new(),
        DecorrelatedJitter::seeded(config, 11),
        |_| async { Err::<(), _>(ServiceError::Unavailable) },
        |event: &RetryEvent<'_, ServiceError>| {
            assert_eq!(event.error, &ServiceError::Unavailable);
            delays.push(event.delay);
        },
    )
    .await;

    assert_eq!(result, Err(ServiceError::Unavailable));
    assert_eq!(delays.len(), 7);
    assert!(delays[0] <= config.multiplier());
    assert!(delays.iter().all(|d| *d <= config.max_wait()));
    assert_eq!(delays[6], Duration::ZERO);
}
