//! Security event entity recorded around authentication throttling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Security-relevant events raised by the authentication flows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    LoginSuccess,
    LoginFailed,
    Logout,
    PasswordChange,
    PasswordResetRequest,
    PasswordResetSuccess,
    EmailVerificationSent,
    EmailVerified,
    EmailChange,
    ProfileUpdate,
    SessionRefreshed,
    SessionExpired,
    RateLimitExceeded,
    SuspiciousActivity,
    AccountLocked,
    AccountUnlocked,
    OauthSuccess,
    OauthFailed,
    TwoFactorEnabled,
    TwoFactorDisabled,
    TwoFactorVerified,
    TwoFactorFailed,
}

impl SecurityEventType {
    /// Stable string form, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::PasswordChange => "password_change",
            Self::PasswordResetRequest => "password_reset_request",
            Self::PasswordResetSuccess => "password_reset_success",
            Self::EmailVerificationSent => "email_verification_sent",
            Self::EmailVerified => "email_verified",
            Self::EmailChange => "email_change",
            Self::ProfileUpdate => "profile_update",
            Self::SessionRefreshed => "session_refreshed",
            Self::SessionExpired => "session_expired",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::SuspiciousActivity => "suspicious_activity",
            Self::AccountLocked => "account_locked",
            Self::AccountUnlocked => "account_unlocked",
            Self::OauthSuccess => "oauth_success",
            Self::OauthFailed => "oauth_failed",
            Self::TwoFactorEnabled => "two_factor_enabled",
            Self::TwoFactorDisabled => "two_factor_disabled",
            Self::TwoFactorVerified => "two_factor_verified",
            Self::TwoFactorFailed => "two_factor_failed",
        }
    }

    /// Severity used when the caller does not pick one
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::LoginSuccess
            | Self::Logout
            | Self::EmailVerificationSent
            | Self::SessionRefreshed
            | Self::ProfileUpdate
            | Self::OauthSuccess
            | Self::TwoFactorVerified => Severity::Low,
            Self::LoginFailed
            | Self::PasswordResetRequest
            | Self::EmailVerified
            | Self::SessionExpired
            | Self::RateLimitExceeded
            | Self::AccountUnlocked
            | Self::OauthFailed
            | Self::TwoFactorFailed => Severity::Medium,
            Self::PasswordChange
            | Self::PasswordResetSuccess
            | Self::EmailChange
            | Self::SuspiciousActivity
            | Self::AccountLocked
            | Self::TwoFactorEnabled
            | Self::TwoFactorDisabled => Severity::High,
        }
    }
}

impl std::fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A recorded security event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    /// Unique identifier for the entry
    pub id: Uuid,

    /// What happened
    pub event_type: SecurityEventType,

    /// Account identifier if known
    pub user_id: Option<String>,

    /// Email the event relates to
    pub email: Option<String>,

    /// When the event occurred
    pub occurred_at: DateTime<Utc>,

    /// IP address of the request
    pub ip_address: Option<String>,

    /// User agent string from the request
    pub user_agent: Option<String>,

    /// Free-form context (reason, action, ...)
    pub metadata: Map<String, JsonValue>,

    pub severity: Severity,
}

impl SecurityEvent {
    /// Create an event with the type's default severity
    pub fn new(event_type: SecurityEventType, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            user_id: None,
            email: None,
            occurred_at,
            ip_address: None,
            user_agent: None,
            metadata: Map::new(),
            severity: event_type.default_severity(),
        }
    }

    /// Add user context
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Add the email the event relates to
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Add request context
    pub fn with_request_context(
        mut self,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    /// Attach one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Override the default severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}
