//! Login guard wiring the throttling components into the sign-in flow.
//!
//! Call order for a login:
//! 1. `before_login` - refuse early while locked or throttled
//! 2. `login_failed` or `login_succeeded` - once credentials were checked

use std::sync::Arc;

use dk_shared::validators::normalize_identifier;
use dk_shared::RateLimitConfig;
use tracing::{debug, info};

use crate::domain::value_objects::{FailedAttemptOutcome, RateLimitDecision};
use crate::errors::{DomainResult, ThrottleError, ValidationError};
use crate::services::audit::{SecurityEventLog, SecurityLogConfig};
use crate::services::clock::Clock;
use crate::services::lockout::{AccountLockoutConfig, AccountRecoveryManager};
use crate::services::throttle::{
    lockout_message, minutes_until, throttled_message, RateLimiter, ThrottlePolicies,
    ThrottledAction,
};

/// Throttling front door for authentication actions
pub struct LoginGuard {
    limiter: Arc<RateLimiter>,
    recovery: Arc<AccountRecoveryManager>,
    events: Arc<SecurityEventLog>,
    policies: ThrottlePolicies,
}

impl LoginGuard {
    pub fn new(
        limiter: Arc<RateLimiter>,
        recovery: Arc<AccountRecoveryManager>,
        events: Arc<SecurityEventLog>,
        policies: ThrottlePolicies,
    ) -> Self {
        Self {
            limiter,
            recovery,
            events,
            policies,
        }
    }

    /// Build every component from configuration, sharing one clock
    pub fn from_config(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> DomainResult<Self> {
        let policies = ThrottlePolicies::from_config(config)?;
        let lockout = AccountLockoutConfig::from_settings(&config.account_lockout)?;

        Ok(Self::new(
            Arc::new(RateLimiter::new(clock.clone())),
            Arc::new(AccountRecoveryManager::new(lockout, clock.clone())),
            Arc::new(SecurityEventLog::new(SecurityLogConfig::default(), clock)),
            policies,
        ))
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn recovery_manager(&self) -> &Arc<AccountRecoveryManager> {
        &self.recovery
    }

    pub fn events(&self) -> &Arc<SecurityEventLog> {
        &self.events
    }

    pub fn policies(&self) -> &ThrottlePolicies {
        &self.policies
    }

    /// Check whether `email` may submit credentials.
    ///
    /// Refused while the account is locked by the recovery manager or the
    /// login limit is spent.
    pub fn before_login(&self, email: &str) -> DomainResult<RateLimitDecision> {
        let email = normalized(email)?;

        let lockout = self.recovery.get_lockout_info(&email);
        if let (true, Some(locked_until)) = (lockout.locked, lockout.locked_until) {
            let minutes_remaining = lockout.minutes_remaining.unwrap_or(0);
            self.events
                .rate_limit_exceeded(&email, ThrottledAction::Login.as_str());

            return Err(ThrottleError::AccountLocked {
                message: lockout_message(ThrottledAction::Login, minutes_remaining),
                locked_until,
                minutes_remaining,
            }
            .into());
        }

        self.check_action(ThrottledAction::Login, &email)
    }

    /// Record a failed login in both the limiter and the recovery manager
    pub fn login_failed(&self, email: &str, reason: &str) -> DomainResult<FailedAttemptOutcome> {
        let email = normalized(email)?;

        self.limiter.record_login_attempt(&email, &self.policies);
        let outcome = self.recovery.record_failed_attempt(&email);

        self.events.login_failed(&email, reason);
        if outcome.locked {
            let minutes = self.recovery.config().lockout_duration.num_minutes();
            self.events.account_locked(&email, minutes);
        }

        Ok(outcome)
    }

    /// Clear the failure history of `email` after a successful login
    pub fn login_succeeded(&self, user_id: &str, email: &str) -> DomainResult<()> {
        let email = normalized(email)?;

        let was_locked = self.recovery.get_lockout_info(&email).locked;
        self.limiter.reset_login_rate_limit(&email, &self.policies);
        if self.recovery.reset_lockout(&email) && was_locked {
            self.events.account_unlocked(&email);
        }

        self.events.login_success(user_id, &email);
        info!(user_id = user_id, "Login succeeded, throttling state cleared");
        Ok(())
    }

    /// Check `identifier` against the policy of `action`
    pub fn check_action(
        &self,
        action: ThrottledAction,
        identifier: &str,
    ) -> DomainResult<RateLimitDecision> {
        let identifier = normalized(identifier)?;
        let check = self.limiter.check_action(action, &identifier, &self.policies);

        if check.allowed() {
            debug!(action = %action, remaining = check.decision.remaining, "Attempt allowed");
            return Ok(check.decision);
        }

        self.events.rate_limit_exceeded(&identifier, action.as_str());

        let decision = check.decision;
        let error = if decision.locked {
            let now = self.limiter.clock().now();
            let minutes_remaining = minutes_until(now, decision.reset_at);
            ThrottleError::AccountLocked {
                message: check
                    .error_message
                    .unwrap_or_else(|| lockout_message(action, minutes_remaining)),
                locked_until: decision.reset_at,
                minutes_remaining,
            }
        } else {
            ThrottleError::RateLimited {
                action: action.as_str().to_string(),
                message: check
                    .error_message
                    .unwrap_or_else(|| throttled_message(action)),
                retry_at: decision.reset_at,
            }
        };

        Err(error.into())
    }

    /// Record one attempt of `action` by `identifier`
    pub fn record_action(&self, action: ThrottledAction, identifier: &str) -> DomainResult<()> {
        let identifier = normalized(identifier)?;
        if action == ThrottledAction::PasswordReset {
            self.events.password_reset_request(&identifier);
        }
        self.limiter.record_action(action, &identifier, &self.policies);
        Ok(())
    }
}

/// Normalized identifier, rejecting blank input
fn normalized(raw: &str) -> Result<String, ValidationError> {
    let normalized = normalize_identifier(raw);
    if normalized.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    Ok(normalized)
}
