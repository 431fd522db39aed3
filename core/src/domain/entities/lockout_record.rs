//! Failed-login record owned by the account recovery manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failed attempt count and lock expiry for one account identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// Consecutive failed attempts since the last reset or lock expiry
    pub attempt_count: u32,
    /// Set once `attempt_count` reaches the configured maximum
    pub locked_until: Option<DateTime<Utc>>,
}

impl LockoutRecord {
    /// Whether the lock is in force at `now`
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Whether a lock was set and has run out at `now`
    pub fn lock_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now >= until)
    }
}
