//! Error types for throttling, lockout and policy validation

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Deny results surfaced to callers that want `?`-style control flow.
///
/// The display text is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThrottleError {
    #[error("{message}")]
    RateLimited {
        /// Throttled action name (`login`, `password_reset`, ...)
        action: String,
        message: String,
        /// When another attempt will be considered
        retry_at: DateTime<Utc>,
    },

    #[error("{message}")]
    AccountLocked {
        message: String,
        locked_until: DateTime<Utc>,
        minutes_remaining: i64,
    },
}

impl ThrottleError {
    /// Instant after which the caller may try again
    pub fn retry_at(&self) -> DateTime<Utc> {
        match self {
            ThrottleError::RateLimited { retry_at, .. } => *retry_at,
            ThrottleError::AccountLocked { locked_until, .. } => *locked_until,
        }
    }

    /// Whether the deny comes from a hard lock rather than window throttling
    pub fn is_lockout(&self) -> bool {
        matches!(self, ThrottleError::AccountLocked { .. })
    }
}

/// Invalid throttling configuration or input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid policy field {field}: {reason}")]
    InvalidPolicy { field: String, reason: String },

    #[error("Invalid key prefix: '{prefix}'")]
    InvalidKeyPrefix { prefix: String },

    #[error("Identifier must not be empty")]
    EmptyIdentifier,
}
