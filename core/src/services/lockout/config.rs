//! Configuration for the account recovery manager

use chrono::Duration;
use dk_shared::AccountLockoutSettings;

use crate::domain::entities::duration_from_secs;
use crate::errors::ValidationError;

/// Live lockout policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLockoutConfig {
    /// Failed attempts before the account is locked (default: 5)
    pub max_failed_attempts: u32,
    /// How long a lock lasts (default: 30 minutes)
    pub lockout_duration: Duration,
    /// Whether `reset_lockout` clears the record (default: true)
    pub reset_after_success: bool,
}

impl Default for AccountLockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_duration: Duration::minutes(30),
            reset_after_success: true,
        }
    }
}

impl AccountLockoutConfig {
    /// Convert the shared settings, rejecting durations chrono cannot represent
    pub fn from_settings(settings: &AccountLockoutSettings) -> Result<Self, ValidationError> {
        Ok(Self {
            max_failed_attempts: settings.max_failed_attempts,
            lockout_duration: duration_from_secs(
                "account_lockout.lockout_duration",
                settings.lockout_duration_seconds,
            )?,
            reset_after_success: settings.reset_after_success,
        })
    }

    /// Merge the fields present in `update`
    pub fn merge(&mut self, update: &AccountLockoutConfigUpdate) {
        if let Some(max) = update.max_failed_attempts {
            self.max_failed_attempts = max;
        }
        if let Some(duration) = update.lockout_duration {
            self.lockout_duration = duration;
        }
        if let Some(reset) = update.reset_after_success {
            self.reset_after_success = reset;
        }
    }
}

/// Partial configuration applied by `AccountRecoveryManager::configure`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountLockoutConfigUpdate {
    pub max_failed_attempts: Option<u32>,
    pub lockout_duration: Option<Duration>,
    pub reset_after_success: Option<bool>,
}

impl AccountLockoutConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_failed_attempts(mut self, max: u32) -> Self {
        self.max_failed_attempts = Some(max);
        self
    }

    pub fn lockout_duration(mut self, duration: Duration) -> Self {
        self.lockout_duration = Some(duration);
        self
    }

    pub fn reset_after_success(mut self, reset: bool) -> Self {
        self.reset_after_success = Some(reset);
        self
    }

    /// Reject a zero attempt limit or a non-positive lock duration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_failed_attempts == Some(0) {
            return Err(ValidationError::InvalidPolicy {
                field: "max_failed_attempts".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.lockout_duration.is_some_and(|d| d <= Duration::zero()) {
            return Err(ValidationError::InvalidPolicy {
                field: "lockout_duration".to_string(),
                reason: "must be a positive duration".to_string(),
            });
        }
        Ok(())
    }
}
