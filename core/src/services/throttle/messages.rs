//! User-facing deny messages.

use chrono::{DateTime, Utc};

use super::policies::ThrottledAction;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Whole minutes from `now` until `until`, rounded up; zero once `until` has passed
pub fn minutes_until(now: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE
}

/// "1 minute", "5 minutes"
pub fn format_minutes(minutes: i64) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", minutes)
    }
}

/// Message for a locked key with its countdown
pub fn lockout_message(action: ThrottledAction, minutes: i64) -> String {
    format!(
        "Too many {} attempts. Please try again in {}.",
        action.noun(),
        format_minutes(minutes)
    )
}

/// Message for a spent window without a lock
pub fn throttled_message(action: ThrottledAction) -> String {
    format!("Too many {} attempts. Please try again later.", action.noun())
}
