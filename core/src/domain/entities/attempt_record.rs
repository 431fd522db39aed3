//! Attempt record entity tracked per throttling key.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ThrottleState;

/// Attempt counter and lock state for one `{key_prefix}:{identifier}` key.
///
/// `count` is only meaningful while `now < window_reset_at`. Once the window
/// elapses, or an expired lock is found, the record must be restarted before
/// any check or record operation reads it. An active lock still denies checks
/// after the window elapsed, but recording past the window starts over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Attempts observed in the current window
    pub count: u32,
    /// When the counter resets to zero
    pub window_reset_at: DateTime<Utc>,
    /// Hard deny until this instant, independent of `count`
    pub locked_until: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Fresh record whose window starts now
    pub fn new(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count: 0,
            window_reset_at: deadline(now, window),
            locked_until: None,
        }
    }

    /// Lock expiry if the lock is still in force at `now`
    pub fn active_lock(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_until.filter(|until| now < *until)
    }

    /// Whether the record must be restarted before use.
    ///
    /// True when the window has elapsed, or when a lock was set and has expired:
    /// lifting a lock also restarts the window.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) => now >= until,
            None => now >= self.window_reset_at,
        }
    }

    /// Whether the counting window has elapsed, regardless of any lock
    pub fn window_elapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.window_reset_at
    }

    /// Reset the counter, clear the lock and open a new window starting at `now`
    pub fn restart(&mut self, now: DateTime<Utc>, window: Duration) {
        self.count = 0;
        self.window_reset_at = deadline(now, window);
        self.locked_until = None;
    }

    /// Attempts left before `max_attempts` is reached, never negative
    pub fn remaining(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.count)
    }

    /// Classify the record at `now` against a limit
    pub fn state(&self, now: DateTime<Utc>, max_attempts: u32) -> ThrottleState {
        if self.active_lock(now).is_some() {
            ThrottleState::Locked
        } else if self.is_stale(now) || self.count < max_attempts {
            ThrottleState::Open
        } else {
            ThrottleState::Throttled
        }
    }
}

/// `now + duration`, saturating at the largest representable instant
pub fn deadline(now: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    now.checked_add_signed(duration)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
