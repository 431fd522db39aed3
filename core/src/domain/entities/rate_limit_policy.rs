//! Immutable rate limit policy for one throttled action.

use chrono::Duration;
use dk_shared::validators;

use crate::errors::ValidationError;

/// Limit on attempts per window, namespaced by `key_prefix` so that the same
/// identifier (e.g. one email) is counted separately for login and password reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_attempts: u32,
    window: Duration,
    key_prefix: String,
}

impl RateLimitPolicy {
    /// Build a policy, rejecting zero attempts, non-positive windows and malformed prefixes
    pub fn new(
        key_prefix: impl Into<String>,
        max_attempts: u32,
        window: Duration,
    ) -> Result<Self, ValidationError> {
        let key_prefix = key_prefix.into();

        if !validators::is_valid_key_prefix(&key_prefix) {
            return Err(ValidationError::InvalidKeyPrefix { prefix: key_prefix });
        }
        if max_attempts == 0 {
            return Err(ValidationError::InvalidPolicy {
                field: "max_attempts".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if window <= Duration::zero() {
            return Err(ValidationError::InvalidPolicy {
                field: "window".to_string(),
                reason: "must be a positive duration".to_string(),
            });
        }

        Ok(Self {
            max_attempts,
            window,
            key_prefix,
        })
    }

    /// Same as [`RateLimitPolicy::new`] with the window given in whole seconds
    pub fn from_seconds(
        key_prefix: impl Into<String>,
        max_attempts: u32,
        window_seconds: u64,
    ) -> Result<Self, ValidationError> {
        let window = duration_from_secs("window", window_seconds)?;
        Self::new(key_prefix, max_attempts, window)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Storage key for an identifier under this policy
    pub fn storage_key(&self, identifier: &str) -> String {
        format!("{}:{}", self.key_prefix, identifier)
    }
}

/// Convert configured seconds into a `Duration`, rejecting values chrono cannot represent
pub fn duration_from_secs(field: &str, seconds: u64) -> Result<Duration, ValidationError> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| ValidationError::InvalidPolicy {
            field: field.to_string(),
            reason: format!("{} seconds is out of range", seconds),
        })
}
