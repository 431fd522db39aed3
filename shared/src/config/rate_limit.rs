//! Throttling configuration: per-action rate limits, account lockout and sweeping

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::utils::validation::{Validate, ValidationErrors};

/// Limit applied to one throttled action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionLimit {
    /// Attempts allowed inside one window
    pub max_attempts: u32,

    /// Window length in seconds
    pub window_seconds: u64,

    /// Lock applied once the limit is reached; `None` means no lock, only throttling
    #[serde(default)]
    pub lock_duration_seconds: Option<u64>,
}

impl ActionLimit {
    pub fn new(max_attempts: u32, window_seconds: u64) -> Self {
        Self {
            max_attempts,
            window_seconds,
            lock_duration_seconds: None,
        }
    }

    pub fn with_lock(mut self, lock_duration_seconds: u64) -> Self {
        self.lock_duration_seconds = Some(lock_duration_seconds);
        self
    }

    fn collect_errors(&self, name: &str, errors: &mut ValidationErrors) {
        if self.max_attempts == 0 {
            errors.add_error(
                format!("{}.max_attempts", name),
                "must be greater than zero",
                "min_value",
            );
        }
        if self.window_seconds == 0 {
            errors.add_error(
                format!("{}.window_seconds", name),
                "must be greater than zero",
                "min_value",
            );
        }
        if self.lock_duration_seconds == Some(0) {
            errors.add_error(
                format!("{}.lock_duration_seconds", name),
                "must be greater than zero when set",
                "min_value",
            );
        }
    }
}

/// Login lockout settings for the account recovery manager
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountLockoutSettings {
    /// Failed attempts before the account is locked
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,

    /// Lock duration in seconds
    #[serde(default = "default_lockout_duration")]
    pub lockout_duration_seconds: u64,

    /// Whether a successful login clears the failure history
    #[serde(default = "default_reset_after_success")]
    pub reset_after_success: bool,
}

impl Default for AccountLockoutSettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed_attempts(),
            lockout_duration_seconds: default_lockout_duration(),
            reset_after_success: default_reset_after_success(),
        }
    }
}

/// Periodic removal of stale throttling records
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SweepSettings {
    /// Run the background sweeper; lazy cleanup on access happens regardless
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between sweeps
    #[serde(default = "default_sweep_interval")]
    pub interval_seconds: u64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_sweep_interval(),
        }
    }
}

/// Rate limiting configuration for every throttled authentication action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Login: 5 attempts per 15 minutes, 30 minute lock
    #[serde(default = "default_login")]
    pub login: ActionLimit,

    /// Password reset: 3 requests per hour
    #[serde(default = "default_password_reset")]
    pub password_reset: ActionLimit,

    /// Sign up: 3 attempts per hour
    #[serde(default = "default_sign_up")]
    pub sign_up: ActionLimit,

    /// OAuth: 10 attempts per hour
    #[serde(default = "default_oauth")]
    pub oauth: ActionLimit,

    /// Account lockout after repeated failed logins
    #[serde(default)]
    pub account_lockout: AccountLockoutSettings,

    /// Background sweeping of abandoned records
    #[serde(default)]
    pub sweep: SweepSettings,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            password_reset: default_password_reset(),
            sign_up: default_sign_up(),
            oauth: default_oauth(),
            account_lockout: AccountLockoutSettings::default(),
            sweep: SweepSettings::default(),
        }
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        self.login.collect_errors("login", &mut errors);
        self.password_reset.collect_errors("password_reset", &mut errors);
        self.sign_up.collect_errors("sign_up", &mut errors);
        self.oauth.collect_errors("oauth", &mut errors);

        if self.account_lockout.max_failed_attempts == 0 {
            errors.add_error(
                "account_lockout.max_failed_attempts",
                "must be greater than zero",
                "min_value",
            );
        }
        if self.account_lockout.lockout_duration_seconds == 0 {
            errors.add_error(
                "account_lockout.lockout_duration_seconds",
                "must be greater than zero",
                "min_value",
            );
        }
        if self.sweep.enabled && self.sweep.interval_seconds == 0 {
            errors.add_error(
                "sweep.interval_seconds",
                "must be greater than zero when sweeping is enabled",
                "min_value",
            );
        }

        errors.into_result()
    }
}

impl RateLimitConfig {
    /// Development configuration (lenient login limit, short locks)
    pub fn development() -> Self {
        Self {
            login: ActionLimit::new(20, 15 * 60).with_lock(60),
            account_lockout: AccountLockoutSettings {
                max_failed_attempts: 20,
                lockout_duration_seconds: 60,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Production configuration
    pub fn production() -> Self {
        Self {
            sweep: SweepSettings {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Apply `THROTTLE_*` overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ValidationErrors> {
        self.with_overrides(|name| env::var(name).ok())
    }

    /// Apply `THROTTLE_*` overrides from an arbitrary lookup.
    ///
    /// Every unparseable variable is reported; a lock duration of `0` disables the lock.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ValidationErrors>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = ValidationErrors::new();

        for (name, limit) in [
            ("LOGIN", &mut self.login),
            ("PASSWORD_RESET", &mut self.password_reset),
            ("SIGN_UP", &mut self.sign_up),
            ("OAUTH", &mut self.oauth),
        ] {
            let prefix = format!("THROTTLE_{}", name);
            if let Some(value) =
                parse_var(&lookup, &format!("{}_MAX_ATTEMPTS", prefix), &mut errors)
            {
                limit.max_attempts = value;
            }
            if let Some(value) =
                parse_var(&lookup, &format!("{}_WINDOW_SECONDS", prefix), &mut errors)
            {
                limit.window_seconds = value;
            }
            if let Some(value) =
                parse_var::<u64, _>(&lookup, &format!("{}_LOCK_SECONDS", prefix), &mut errors)
            {
                limit.lock_duration_seconds = (value > 0).then_some(value);
            }
        }

        let lockout = &mut self.account_lockout;
        if let Some(value) =
            parse_var(&lookup, "THROTTLE_LOCKOUT_MAX_FAILED_ATTEMPTS", &mut errors)
        {
            lockout.max_failed_attempts = value;
        }
        if let Some(value) = parse_var(&lookup, "THROTTLE_LOCKOUT_DURATION_SECONDS", &mut errors) {
            lockout.lockout_duration_seconds = value;
        }
        if let Some(value) =
            parse_var(&lookup, "THROTTLE_LOCKOUT_RESET_AFTER_SUCCESS", &mut errors)
        {
            lockout.reset_after_success = value;
        }

        if let Some(value) = parse_var(&lookup, "THROTTLE_SWEEP_ENABLED", &mut errors) {
            self.sweep.enabled = value;
        }
        if let Some(value) = parse_var(&lookup, "THROTTLE_SWEEP_INTERVAL_SECONDS", &mut errors) {
            self.sweep.interval_seconds = value;
        }

        errors.into_result().map(|_| self)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, errors: &mut ValidationErrors) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add_error(name, format!("cannot parse '{}'", raw), "parse");
            None
        }
    }
}

fn default_login() -> ActionLimit {
    ActionLimit::new(5, 15 * 60).with_lock(30 * 60)
}

fn default_password_reset() -> ActionLimit {
    ActionLimit::new(3, 60 * 60)
}

fn default_sign_up() -> ActionLimit {
    ActionLimit::new(3, 60 * 60)
}

fn default_oauth() -> ActionLimit {
    ActionLimit::new(10, 60 * 60)
}

fn default_max_failed_attempts() -> u32 {
    5
}

fn default_lockout_duration() -> u64 {
    30 * 60 // 30 minutes
}

fn default_reset_after_success() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    300 // 5 minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_policy_table() {
        let config = RateLimitConfig::default();

        assert_eq!(config.login, ActionLimit::new(5, 900).with_lock(1800));
        assert_eq!(config.password_reset, ActionLimit::new(3, 3600));
        assert_eq!(config.sign_up, ActionLimit::new(3, 3600));
        assert_eq!(config.oauth, ActionLimit::new(10, 3600));
        assert_eq!(config.account_lockout.max_failed_attempts, 5);
        assert_eq!(config.account_lockout.lockout_duration_seconds, 1800);
        assert!(config.account_lockout.reset_after_success);
        assert!(!config.sweep.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profiles_are_valid() {
        assert!(RateLimitConfig::development().validate().is_ok());
        assert!(RateLimitConfig::production().validate().is_ok());
        assert!(RateLimitConfig::production().sweep.enabled);
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        let mut config = RateLimitConfig::default();
        config.login.max_attempts = 0;
        config.oauth.window_seconds = 0;
        config.sign_up.lock_duration_seconds = Some(0);
        config.account_lockout.max_failed_attempts = 0;

        let errors = config.validate().unwrap_err();
        let fields = errors.to_field_errors();
        assert_eq!(errors.errors().len(), 4);
        assert!(fields.contains_key("login.max_attempts"));
        assert!(fields.contains_key("oauth.window_seconds"));
        assert!(fields.contains_key("sign_up.lock_duration_seconds"));
        assert!(fields.contains_key("account_lockout.max_failed_attempts"));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = RateLimitConfig::default()
            .with_overrides(lookup_from(&[
                ("THROTTLE_LOGIN_MAX_ATTEMPTS", "7"),
                ("THROTTLE_LOGIN_LOCK_SECONDS", "0"),
                ("THROTTLE_OAUTH_WINDOW_SECONDS", " 120 "),
                ("THROTTLE_LOCKOUT_RESET_AFTER_SUCCESS", "false"),
                ("THROTTLE_SWEEP_ENABLED", "true"),
            ]))
            .unwrap();

        assert_eq!(config.login.max_attempts, 7);
        assert_eq!(config.login.lock_duration_seconds, None);
        assert_eq!(config.oauth.window_seconds, 120);
        assert!(!config.account_lockout.reset_after_success);
        assert!(config.sweep.enabled);
        // Untouched values keep their defaults
        assert_eq!(config.password_reset, ActionLimit::new(3, 3600));
    }

    #[test]
    fn test_overrides_report_parse_failures() {
        let errors = RateLimitConfig::default()
            .with_overrides(lookup_from(&[
                ("THROTTLE_LOGIN_MAX_ATTEMPTS", "five"),
                ("THROTTLE_SWEEP_ENABLED", "maybe"),
            ]))
            .unwrap_err();

        let fields = errors.to_field_errors();
        assert!(fields.contains_key("THROTTLE_LOGIN_MAX_ATTEMPTS"));
        assert!(fields.contains_key("THROTTLE_SWEEP_ENABLED"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: RateLimitConfig = serde_json::from_str(
            r#"{"login":{"max_attempts":3,"window_seconds":60},"account_lockout":{"max_failed_attempts":2}}"#,
        )
        .unwrap();

        assert_eq!(config.login, ActionLimit::new(3, 60));
        assert_eq!(config.account_lockout.max_failed_attempts, 2);
        assert_eq!(config.account_lockout.lockout_duration_seconds, 1800);
        assert_eq!(config.oauth, ActionLimit::new(10, 3600));
    }
}
