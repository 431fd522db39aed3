//! Login helpers and deny messages.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::services::clock::ManualClock;
use crate::services::throttle::{
    format_minutes, lockout_message, minutes_until, throttled_message, RateLimiter,
    ThrottlePolicies, ThrottledAction,
};

fn setup() -> (RateLimiter, Arc<ManualClock>, ThrottlePolicies) {
    let clock = Arc::new(ManualClock::at_epoch());
    let limiter = RateLimiter::new(clock.clone());
    (limiter, clock, ThrottlePolicies::standard().unwrap())
}

#[test]
fn test_minutes_until_rounds_up() {
    let now = DateTime::<Utc>::UNIX_EPOCH;

    assert_eq!(minutes_until(now, now + Duration::minutes(30)), 30);
    assert_eq!(minutes_until(now, now + Duration::seconds(61)), 2);
    assert_eq!(minutes_until(now, now + Duration::milliseconds(1)), 1);
    assert_eq!(minutes_until(now, now), 0);
    assert_eq!(minutes_until(now, now - Duration::minutes(5)), 0);
}

#[test]
fn test_messages() {
    assert_eq!(format_minutes(1), "1 minute");
    assert_eq!(format_minutes(12), "12 minutes");
    assert_eq!(
        lockout_message(ThrottledAction::Login, 1),
        "Too many login attempts. Please try again in 1 minute."
    );
    assert_eq!(
        throttled_message(ThrottledAction::OAuth),
        "Too many sign-in attempts. Please try again later."
    );
}

#[test]
fn test_login_helpers_lock_after_five_failures() {
    let (limiter, clock, policies) = setup();
    let email = "user@example.com";

    for _ in 0..5 {
        let check = limiter.check_login_rate_limit(email, &policies);
        assert!(check.allowed());
        assert_eq!(check.error_message, None);
        limiter.record_login_attempt(email, &policies);
    }

    let check = limiter.check_login_rate_limit(email, &policies);
    assert!(!check.allowed());
    assert!(check.decision.locked);
    assert_eq!(check.decision.remaining, 0);
    assert_eq!(
        check.error_message.as_deref(),
        Some("Too many login attempts. Please try again in 30 minutes.")
    );

    clock.advance(Duration::minutes(10));
    let check = limiter.check_login_rate_limit(email, &policies);
    assert_eq!(
        check.error_message.as_deref(),
        Some("Too many login attempts. Please try again in 20 minutes.")
    );
}

#[test]
fn test_reset_login_rate_limit() {
    let (limiter, _clock, policies) = setup();
    let email = "user@example.com";

    for _ in 0..5 {
        limiter.record_login_attempt(email, &policies);
    }
    limiter.reset_login_rate_limit(email, &policies);

    let check = limiter.check_login_rate_limit(email, &policies);
    assert!(check.allowed());
    assert_eq!(check.decision.remaining, 5);
}

#[test]
fn test_helpers_normalize_email() {
    let (limiter, _clock, policies) = setup();

    limiter.record_login_attempt("Bob@Example.com", &policies);
    limiter.record_login_attempt(" bob@example.com", &policies);

    let check = limiter.check_login_rate_limit("BOB@EXAMPLE.COM", &policies);
    assert_eq!(check.decision.remaining, 3);
}

#[test]
fn test_password_reset_and_login_share_nothing() {
    let (limiter, _clock, policies) = setup();
    let email = "user@example.com";

    for _ in 0..3 {
        limiter.record_action(ThrottledAction::PasswordReset, email, &policies);
    }

    let reset = limiter.check_action(ThrottledAction::PasswordReset, email, &policies);
    assert!(!reset.allowed());
    assert!(!reset.decision.locked);
    assert_eq!(
        reset.error_message.as_deref(),
        Some("Too many password reset attempts. Please try again later.")
    );

    let login = limiter.check_login_rate_limit(email, &policies);
    assert!(login.allowed());
    assert_eq!(login.decision.remaining, 5);
}

#[test]
fn test_action_check_serializes_flat() {
    let (limiter, _clock, policies) = setup();
    let check = limiter.check_action(ThrottledAction::SignUp, "user@example.com", &policies);

    let json = serde_json::to_value(&check).unwrap();
    assert_eq!(json["action"], "sign_up");
    assert_eq!(json["allowed"], true);
    assert_eq!(json["remaining"], 3);
    assert!(json["error_message"].is_null());
}
