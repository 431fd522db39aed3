//! Results returned by the rate limiter and the account recovery manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Throttling state of one key: `Open -> Throttled -> Locked -> Open`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleState {
    /// Attempts are allowed
    Open,
    /// The window's attempt budget is spent, no lock applies
    Throttled,
    /// Hard deny until the lock expires
    Locked,
}

/// Answer to "may I attempt?" for one identifier under one policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Attempts left in the current window, zero while locked
    pub remaining: u32,
    /// Window reset, or lock expiry when `locked`
    pub reset_at: DateTime<Utc>,
    pub locked: bool,
}

impl RateLimitDecision {
    pub fn state(&self) -> ThrottleState {
        match (self.locked, self.allowed) {
            (true, _) => ThrottleState::Locked,
            (false, true) => ThrottleState::Open,
            (false, false) => ThrottleState::Throttled,
        }
    }
}

/// Outcome of recording a failed login with the account recovery manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAttemptOutcome {
    pub locked: bool,
    pub attempts_remaining: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Lockout status with a human-facing countdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutInfo {
    pub locked: bool,
    pub locked_until: Option<DateTime<Utc>>,
    /// Time left rounded up to whole minutes
    pub minutes_remaining: Option<i64>,
}

impl LockoutInfo {
    pub fn unlocked() -> Self {
        Self::default()
    }
}
