//! Property-based tests for the delay policies

use decorr_backoff::{Config, DecorrelatedJitter, RetryPolicy, Schedule, ScheduledBackoff};
use proptest::prelude::*;
use std::time::Duration;

fn drain(policy: &mut impl RetryPolicy) -> Vec<Duration> {
    let mut delays = Vec::new();
    while policy.advance() {
        delays.push(policy.delay());
    }
    delays
}

prop_compose! {
    fn config()(
        retries in 0i64..40,
        multiplier_ms in 1u64..10_000,
        max_wait_ms in 1u64..600_000,
    ) -> Config {
        Config::new()
            .with_max_retries(retries)
            .with_multiplier(Duration::from_millis(multiplier_ms))
            .with_max_wait(Duration::from_millis(max_wait_ms))
    }
}

fn schedule() -> impl Strategy<Value = Schedule> {
    prop_oneof![
        Just(Schedule::Constant),
        Just(Schedule::Linear),
        Just(Schedule::Exponential),
        Just(Schedule::Fibonacci),
    ]
}

proptest! {
    #[test]
    fn prop_attempt_count_is_retries_plus_one(config in config(), seed in any::<u64>()) {
        let delays = drain(&mut DecorrelatedJitter::seeded(config, seed));
        prop_assert_eq!(delays.len() as u64, config.max_attempts());
    }

    #[test]
    fn prop_terminal_delay_is_zero(config in config(), seed in any::<u64>()) {
        let delays = drain(&mut DecorrelatedJitter::seeded(config, seed));
        prop_assert_eq!(delays.last().copied(), Some(Duration::ZERO));
    }

    #[test]
    fn prop_delays_never_exceed_cap(config in config(), seed in any::<u64>()) {
        let delays = drain(&mut DecorrelatedJitter::seeded(config, seed));
        for delay in delays {
            prop_assert!(delay <= config.max_wait());
        }
    }

    #[test]
    fn prop_first_delay_is_at_most_base(config in config(), seed in any::<u64>()) {
        let mut policy = DecorrelatedJitter::seeded(config, seed);
        prop_assert!(policy.advance());
        prop_assert!(policy.delay() <= config.multiplier());
    }

    #[test]
    fn prop_growth_at_most_triples(config in config(), seed in any::<u64>()) {
        let mut policy = DecorrelatedJitter::seeded(config, seed);
        let mut previous = Duration::ZERO;
        while policy.advance() {
            let delay = policy.delay();
            if !previous.is_zero() && !delay.is_zero() {
                prop_assert!(delay <= config.multiplier().max(previous * 3));
            }
            if !delay.is_zero() {
                previous = delay;
            }
        }
    }

    #[test]
    fn prop_same_seed_is_deterministic(config in config(), seed in any::<u64>()) {
        let first = drain(&mut DecorrelatedJitter::seeded(config, seed));
        let second = drain(&mut DecorrelatedJitter::seeded(config, seed));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_reset_restores_budget(config in config(), seed in any::<u64>()) {
        let mut policy = DecorrelatedJitter::seeded(config, seed);
        let first = drain(&mut policy);
        policy.reset();
        let second = drain(&mut policy);
        prop_assert_eq!(first.len(), second.len());
        prop_assert_eq!(second.last().copied(), Some(Duration::ZERO));
    }

    #[test]
    fn prop_cap_below_base_saturates(
        retries in 1i64..20,
        seed in any::<u64>(),
        cap_ms in 1u64..100,
    ) {
        let config = Config::new()
            .with_max_retries(retries)
            .with_multiplier(Duration::from_millis(100 + cap_ms))
            .with_max_wait(Duration::from_millis(cap_ms));
        let mut policy = DecorrelatedJitter::seeded(config, seed);

        // Skip the first retry, which is drawn below the base and may land under the cap.
        prop_assert!(policy.advance());
        let _ = policy.delay();
        while policy.advance() {
            let delay = policy.delay();
            if policy.attempt() < config.max_attempts() {
                prop_assert_eq!(delay, config.max_wait());
            }
        }
    }

    #[test]
    fn prop_scheduled_policies_share_the_contract(config in config(), schedule in schedule()) {
        let delays = drain(&mut ScheduledBackoff::new(schedule, config));
        prop_assert_eq!(delays.len() as u64, config.max_attempts());
        prop_assert_eq!(delays.last().copied(), Some(Duration::ZERO));
        for delay in &delays {
            prop_assert!(*delay <= config.max_wait());
        }
    }
}
