//! Predefined policies for the throttled authentication actions.

use chrono::Duration;
use dk_shared::{ActionLimit, RateLimitConfig, Validate};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{duration_from_secs, RateLimitPolicy};
use crate::errors::{DomainResult, ValidationError};

/// Authentication actions with their own attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottledAction {
    Login,
    PasswordReset,
    SignUp,
    #[serde(rename = "oauth")]
    OAuth,
}

impl ThrottledAction {
    pub const ALL: [ThrottledAction; 4] = [
        ThrottledAction::Login,
        ThrottledAction::PasswordReset,
        ThrottledAction::SignUp,
        ThrottledAction::OAuth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::PasswordReset => "password_reset",
            Self::SignUp => "sign_up",
            Self::OAuth => "oauth",
        }
    }

    /// Storage namespace of the action's counters
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Login => "rate_limit:login",
            Self::PasswordReset => "rate_limit:password_reset",
            Self::SignUp => "rate_limit:signup",
            Self::OAuth => "rate_limit:oauth",
        }
    }

    /// Wording used in user-facing messages ("Too many {noun} attempts")
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::PasswordReset => "password reset",
            Self::SignUp => "sign up",
            Self::OAuth => "sign-in",
        }
    }
}

impl std::fmt::Display for ThrottledAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate limit plus the optional lock applied once it is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPolicy {
    pub limit: RateLimitPolicy,
    pub lock_duration: Option<Duration>,
}

impl ActionPolicy {
    fn from_limit(action: ThrottledAction, limit: &ActionLimit) -> Result<Self, ValidationError> {
        let policy = RateLimitPolicy::from_seconds(
            action.key_prefix(),
            limit.max_attempts,
            limit.window_seconds,
        )
        .map_err(|err| scoped(action, err))?;

        let lock_duration = limit
            .lock_duration_seconds
            .map(|secs| duration_from_secs("lock_duration", secs))
            .transpose()
            .map_err(|err| scoped(action, err))?;

        Ok(Self {
            limit: policy,
            lock_duration,
        })
    }
}

fn scoped(action: ThrottledAction, err: ValidationError) -> ValidationError {
    match err {
        ValidationError::InvalidPolicy { field, reason } => ValidationError::InvalidPolicy {
            field: format!("{}.{}", action, field),
            reason,
        },
        other => other,
    }
}

/// Policy table for every throttled action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicies {
    login: ActionPolicy,
    password_reset: ActionPolicy,
    sign_up: ActionPolicy,
    oauth: ActionPolicy,
}

impl ThrottlePolicies {
    /// Build the table from configuration, validating every limit
    pub fn from_config(config: &RateLimitConfig) -> DomainResult<Self> {
        config.validate()?;

        Ok(Self {
            login: ActionPolicy::from_limit(ThrottledAction::Login, &config.login)?,
            password_reset: ActionPolicy::from_limit(
                ThrottledAction::PasswordReset,
                &config.password_reset,
            )?,
            sign_up: ActionPolicy::from_limit(ThrottledAction::SignUp, &config.sign_up)?,
            oauth: ActionPolicy::from_limit(ThrottledAction::OAuth, &config.oauth)?,
        })
    }

    /// The default table: login 5 per 15 min with a 30 min lock, password reset and
    /// sign up 3 per hour, oauth 10 per hour
    pub fn standard() -> DomainResult<Self> {
        Self::from_config(&RateLimitConfig::default())
    }

    pub fn get(&self, action: ThrottledAction) -> &ActionPolicy {
        match action {
            ThrottledAction::Login => &self.login,
            ThrottledAction::PasswordReset => &self.password_reset,
            ThrottledAction::SignUp => &self.sign_up,
            ThrottledAction::OAuth => &self.oauth,
        }
    }

    pub fn login(&self) -> &ActionPolicy {
        &self.login
    }

    /// Replace the policy for one action
    pub fn with_policy(mut self, action: ThrottledAction, policy: ActionPolicy) -> Self {
        match action {
            ThrottledAction::Login => self.login = policy,
            ThrottledAction::PasswordReset => self.password_reset = policy,
            ThrottledAction::SignUp => self.sign_up = policy,
            ThrottledAction::OAuth => self.oauth = policy,
        }
        self
    }
}
