//! Call-site helpers for the predefined throttled actions.
//!
//! Identifiers are normalized (trimmed, lower-cased) so that `Bob@X.com` and
//! `bob@x.com` share one counter.

use dk_shared::validators::normalize_identifier;
use serde::Serialize;

use super::messages::{lockout_message, minutes_until, throttled_message};
use super::policies::{ThrottlePolicies, ThrottledAction};
use super::rate_limiter::RateLimiter;
use super::store::AttemptStore;
use crate::domain::entities::AttemptRecord;
use crate::domain::value_objects::RateLimitDecision;

/// Decision plus the message to show when the attempt is refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCheck {
    pub action: ThrottledAction,
    #[serde(flatten)]
    pub decision: RateLimitDecision,
    pub error_message: Option<String>,
}

impl ActionCheck {
    pub fn allowed(&self) -> bool {
        self.decision.allowed
    }
}

impl<S> RateLimiter<S>
where
    S: AttemptStore<AttemptRecord>,
{
    /// Check `identifier` against the policy of `action`
    pub fn check_action(
        &self,
        action: ThrottledAction,
        identifier: &str,
        policies: &ThrottlePolicies,
    ) -> ActionCheck {
        let identifier = normalize_identifier(identifier);
        let decision = self.check_limit(&identifier, &policies.get(action).limit);

        let error_message = if decision.allowed {
            None
        } else if decision.locked {
            let minutes = minutes_until(self.clock().now(), decision.reset_at);
            Some(lockout_message(action, minutes))
        } else {
            Some(throttled_message(action))
        };

        ActionCheck {
            action,
            decision,
            error_message,
        }
    }

    /// Record an attempt of `action`, locking when the action's policy has a lock
    pub fn record_action(
        &self,
        action: ThrottledAction,
        identifier: &str,
        policies: &ThrottlePolicies,
    ) {
        let identifier = normalize_identifier(identifier);
        let policy = policies.get(action);
        self.record_attempt(&identifier, &policy.limit, policy.lock_duration);
    }

    /// Clear the counter and lock of `action` for `identifier`
    pub fn reset_action(
        &self,
        action: ThrottledAction,
        identifier: &str,
        policies: &ThrottlePolicies,
    ) {
        let identifier = normalize_identifier(identifier);
        self.reset(&identifier, &policies.get(action).limit);
    }

    /// Check before submitting credentials
    pub fn check_login_rate_limit(&self, email: &str, policies: &ThrottlePolicies) -> ActionCheck {
        self.check_action(ThrottledAction::Login, email, policies)
    }

    /// Record a failed login; locks for the login lock duration at the limit
    pub fn record_login_attempt(&self, email: &str, policies: &ThrottlePolicies) {
        self.record_action(ThrottledAction::Login, email, policies);
    }

    /// Clear the login counter, e.g. after a successful login
    pub fn reset_login_rate_limit(&self, email: &str, policies: &ThrottlePolicies) {
        self.reset_action(ThrottledAction::Login, email, policies);
    }
}
