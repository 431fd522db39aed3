//! Sweeper tests. Record expiry follows the manual clock; the sweep schedule
//! follows tokio's paused clock.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use dk_shared::SweepSettings;

use crate::domain::entities::RateLimitPolicy;
use crate::services::cleanup::{Sweep, SweeperConfig, ThrottleSweeper};
use crate::services::clock::ManualClock;
use crate::services::lockout::{AccountLockoutConfig, AccountRecoveryManager};
use crate::services::throttle::RateLimiter;

fn policy() -> RateLimitPolicy {
    RateLimitPolicy::new("rate_limit:login", 5, Duration::minutes(15)).unwrap()
}

struct Fixture {
    clock: Arc<ManualClock>,
    limiter: Arc<RateLimiter>,
    recovery: Arc<AccountRecoveryManager>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::at_epoch());
    let limiter = Arc::new(RateLimiter::new(clock.clone()));
    let config = AccountLockoutConfig {
        max_failed_attempts: 2,
        lockout_duration: Duration::minutes(5),
        reset_after_success: true,
    };
    let recovery = Arc::new(AccountRecoveryManager::new(config, clock.clone()));
    Fixture {
        clock,
        limiter,
        recovery,
    }
}

fn sweeper(fixture: &Fixture, enabled: bool) -> ThrottleSweeper {
    let config = SweeperConfig {
        enabled,
        interval: StdDuration::from_secs(60),
    };
    ThrottleSweeper::new(config)
        .with_target(fixture.limiter.clone())
        .with_target(fixture.recovery.clone())
}

#[test]
fn test_rate_limiter_sweep_keeps_live_records() {
    let f = fixture();
    let policy = policy();

    f.limiter.record_attempt("old@example.com", &policy, None);
    f.clock.advance(Duration::minutes(10));
    f.limiter.record_attempt("new@example.com", &policy, None);
    f.limiter
        .record_attempt("locked@example.com", &policy, Some(Duration::hours(1)));
    for _ in 0..4 {
        f.limiter
            .record_attempt("locked@example.com", &policy, Some(Duration::hours(1)));
    }

    f.clock.advance(Duration::minutes(6));

    assert_eq!(f.limiter.sweep_expired(), 1);
    assert_eq!(f.limiter.tracked_keys(), 2);
    assert!(f.limiter.peek("old@example.com", &policy).is_none());
    assert!(f.limiter.peek("locked@example.com", &policy).is_some());
}

#[test]
fn test_recovery_sweep_only_drops_expired_locks() {
    let f = fixture();

    f.recovery.record_failed_attempt("locked@example.com");
    f.recovery.record_failed_attempt("locked@example.com");
    f.recovery.record_failed_attempt("counting@example.com");

    f.clock.advance(Duration::minutes(5));

    assert_eq!(Sweep::sweep_expired(f.recovery.as_ref()), 1);
    assert_eq!(f.recovery.tracked_accounts(), 1);
    assert_eq!(f.recovery.failed_attempts("counting@example.com"), 1);
}

#[test]
fn test_run_once_reports_per_target() {
    let f = fixture();
    let sweeper = sweeper(&f, true);

    f.limiter.record_attempt("user@example.com", &policy(), None);
    f.recovery.record_failed_attempt("user@example.com");
    f.recovery.record_failed_attempt("user@example.com");

    let result = sweeper.run_once();
    assert_eq!(result.total_removed(), 0);
    assert_eq!(
        result.removed,
        vec![("rate_limiter", 0), ("account_recovery", 0)]
    );

    f.clock.advance(Duration::minutes(15));
    let result = sweeper.run_once();
    assert_eq!(
        result.removed,
        vec![("rate_limiter", 1), ("account_recovery", 1)]
    );
    assert_eq!(result.total_removed(), 2);
}

#[test]
fn test_config_from_settings() {
    let config = SweeperConfig::from_settings(&SweepSettings {
        enabled: true,
        interval_seconds: 120,
    });
    assert!(config.enabled);
    assert_eq!(config.interval, StdDuration::from_secs(120));

    assert!(!SweeperConfig::default().enabled);
}

#[tokio::test]
async fn test_disabled_sweeper_does_not_start() {
    let f = fixture();
    let sweeper = Arc::new(sweeper(&f, false));
    assert!(sweeper.start_background_task().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_background_task_sweeps_on_interval() {
    let f = fixture();
    let sweeper = Arc::new(sweeper(&f, true));

    f.limiter.record_attempt("user@example.com", &policy(), None);
    let handle = sweeper.start_background_task().unwrap();

    // First tick fires immediately; the record is still live
    tokio::time::sleep(StdDuration::from_secs(1)).await;
    assert_eq!(f.limiter.tracked_keys(), 1);

    f.clock.advance(Duration::minutes(15));
    tokio::time::sleep(StdDuration::from_secs(60)).await;
    assert_eq!(f.limiter.tracked_keys(), 0);

    handle.abort();
}
