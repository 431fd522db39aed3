//! End-to-end throttling scenarios through the public API.

use std::sync::Arc;

use chrono::Duration;
use dk_core::{
    AccountLockoutConfig, AccountRecoveryManager, Clock, DomainError, LoginGuard, ManualClock,
    RateLimitPolicy, RateLimiter, SecurityEventType, ThrottleError, ThrottleState,
    ThrottlePolicies, ThrottledAction,
};
use dk_shared::{AppConfig, Environment, RateLimitConfig};

#[test]
fn login_policy_locks_on_sixth_check() {
    let clock = Arc::new(ManualClock::at_epoch());
    let limiter = RateLimiter::new(clock.clone());
    let policy = RateLimitPolicy::from_seconds("rate_limit:login", 5, 900).unwrap();
    let lock = Some(Duration::milliseconds(1_800_000));

    for _ in 0..5 {
        assert!(limiter.check_limit("alice@example.com", &policy).allowed);
        limiter.record_attempt("alice@example.com", &policy, lock);
    }

    let decision = limiter.check_limit("alice@example.com", &policy);
    assert!(!decision.allowed);
    assert!(decision.locked);
    assert_eq!(decision.remaining, 0);
    assert_eq!(decision.state(), ThrottleState::Locked);
    assert_eq!(decision.reset_at, clock.now() + Duration::minutes(30));
}

#[test]
fn recovery_manager_locks_on_third_attempt() {
    let clock = Arc::new(ManualClock::at_epoch());
    let t = clock.now();
    let manager = AccountRecoveryManager::new(
        AccountLockoutConfig {
            max_failed_attempts: 3,
            lockout_duration: Duration::milliseconds(60_000),
            reset_after_success: true,
        },
        clock.clone(),
    );

    manager.record_failed_attempt("bob@example.com");
    manager.record_failed_attempt("bob@example.com");
    let outcome = manager.record_failed_attempt("bob@example.com");

    assert!(outcome.locked);
    assert_eq!(outcome.locked_until, Some(t + Duration::milliseconds(60_000)));
    assert!(manager.is_locked("bob@example.com"));

    clock.set(t + Duration::milliseconds(60_000));
    assert!(!manager.is_locked("bob@example.com"));
}

#[test]
fn login_and_password_reset_are_namespaced() {
    let clock = Arc::new(ManualClock::at_epoch());
    let limiter = RateLimiter::new(clock);
    let policies = ThrottlePolicies::standard().unwrap();
    let email = "carol@example.com";

    for _ in 0..5 {
        limiter.record_login_attempt(email, &policies);
    }

    assert!(!limiter.check_login_rate_limit(email, &policies).allowed());
    let reset = limiter.check_action(ThrottledAction::PasswordReset, email, &policies);
    assert!(reset.allowed());
    assert_eq!(reset.decision.remaining, 3);
}

#[test]
fn guard_full_login_cycle() {
    let clock = Arc::new(ManualClock::at_epoch());
    let guard = LoginGuard::from_config(&RateLimitConfig::default(), clock.clone()).unwrap();
    let email = "dave@example.com";

    for _ in 0..5 {
        guard.before_login(email).unwrap();
        guard.login_failed(email, "invalid password").unwrap();
    }

    match guard.before_login(email) {
        Err(DomainError::Throttle(ThrottleError::AccountLocked {
            minutes_remaining, ..
        })) => assert_eq!(minutes_remaining, 30),
        other => panic!("expected lockout, got {:?}", other),
    }

    clock.advance(Duration::minutes(30));
    guard.before_login(email).unwrap();
    guard.login_succeeded("user-42", email).unwrap();

    let recent = guard.events().recent_events(Some(1));
    assert_eq!(recent[0].event_type, SecurityEventType::LoginSuccess);
    assert_eq!(recent[0].user_id.as_deref(), Some("user-42"));
}

#[test]
fn development_profile_is_lenient() {
    let config = AppConfig::for_environment(Environment::Development);
    let clock = Arc::new(ManualClock::at_epoch());
    let guard = LoginGuard::from_config(&config.rate_limit, clock).unwrap();

    for _ in 0..10 {
        guard.login_failed("eve@example.com", "invalid password").unwrap();
    }
    assert!(guard.before_login("eve@example.com").is_ok());
}
