//! In-memory security event log.
//!
//! Records authentication and throttling events in a bounded buffer so recent
//! activity can be inspected per user, per type or per severity. Every event
//! is mirrored to `tracing` at a level derived from its severity.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::domain::entities::{SecurityEvent, SecurityEventType, Severity};
use crate::services::clock::{Clock, SystemClock};

/// Configuration for the security event log
#[derive(Debug, Clone)]
pub struct SecurityLogConfig {
    /// Events kept before the oldest are dropped
    pub max_events: usize,
    /// Result cap used by the query helpers when no limit is given
    pub default_query_limit: usize,
}

impl Default for SecurityLogConfig {
    fn default() -> Self {
        Self {
            max_events: 1000,
            default_query_limit: 50,
        }
    }
}

/// Bounded log of security events, newest at the front
pub struct SecurityEventLog {
    events: Mutex<VecDeque<SecurityEvent>>,
    config: SecurityLogConfig,
    clock: Arc<dyn Clock>,
}

impl SecurityEventLog {
    /// Create a new security event log
    pub fn new(config: SecurityLogConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(config.max_events.min(1024))),
            config,
            clock,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SecurityLogConfig::default(), Arc::new(SystemClock))
    }

    fn events(&self) -> MutexGuard<'_, VecDeque<SecurityEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start an event of `event_type` stamped with the log's clock
    pub fn event(&self, event_type: SecurityEventType) -> SecurityEvent {
        SecurityEvent::new(event_type, self.clock.now())
    }

    /// Record an event, dropping the oldest once the log is full
    pub fn log(&self, event: SecurityEvent) {
        trace_event(&event);

        if self.config.max_events == 0 {
            return;
        }

        let mut events = self.events();
        events.push_front(event);
        events.truncate(self.config.max_events);
    }

    fn query<F>(&self, limit: Option<usize>, mut filter: F) -> Vec<SecurityEvent>
    where
        F: FnMut(&SecurityEvent) -> bool,
    {
        let limit = limit.unwrap_or(self.config.default_query_limit);
        self.events()
            .iter()
            .filter(|event| filter(event))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Events of one user, newest first
    pub fn events_for_user(&self, user_id: &str, limit: Option<usize>) -> Vec<SecurityEvent> {
        self.query(limit, |event| event.user_id.as_deref() == Some(user_id))
    }

    /// Events of one type, newest first
    pub fn events_by_type(
        &self,
        event_type: SecurityEventType,
        limit: Option<usize>,
    ) -> Vec<SecurityEvent> {
        self.query(limit, |event| event.event_type == event_type)
    }

    /// Events of exactly `severity`, newest first
    pub fn events_by_severity(
        &self,
        severity: Severity,
        limit: Option<usize>,
    ) -> Vec<SecurityEvent> {
        self.query(limit, |event| event.severity == severity)
    }

    /// Most recent events of any kind
    pub fn recent_events(&self, limit: Option<usize>) -> Vec<SecurityEvent> {
        self.query(limit, |_| true)
    }

    /// Every stored event, newest first
    pub fn all_events(&self) -> Vec<SecurityEvent> {
        self.events().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    /// Log a successful login
    pub fn login_success(&self, user_id: &str, email: &str) {
        self.log(
            self.event(SecurityEventType::LoginSuccess)
                .with_user(user_id)
                .with_email(email),
        );
    }

    /// Log a failed login with its reason
    pub fn login_failed(&self, email: &str, reason: &str) {
        self.log(
            self.event(SecurityEventType::LoginFailed)
                .with_email(email)
                .with_metadata("reason", reason),
        );
    }

    pub fn logout(&self, user_id: &str) {
        self.log(self.event(SecurityEventType::Logout).with_user(user_id));
    }

    pub fn password_reset_request(&self, email: &str) {
        self.log(self.event(SecurityEventType::PasswordResetRequest).with_email(email));
    }

    /// Log a refused attempt of `action` by `identifier`
    pub fn rate_limit_exceeded(&self, identifier: &str, action: &str) {
        self.log(
            self.event(SecurityEventType::RateLimitExceeded)
                .with_email(identifier)
                .with_metadata("action", action),
        );
    }

    /// Log an account lock, recording the lock length in minutes
    pub fn account_locked(&self, email: &str, duration_minutes: i64) {
        self.log(
            self.event(SecurityEventType::AccountLocked)
                .with_email(email)
                .with_metadata("duration_minutes", duration_minutes),
        );
    }

    pub fn account_unlocked(&self, email: &str) {
        self.log(self.event(SecurityEventType::AccountUnlocked).with_email(email));
    }

    /// Log suspicious activity; always high severity
    pub fn suspicious_activity(
        &self,
        user_id: Option<&str>,
        email: Option<&str>,
        description: &str,
    ) {
        let mut event = self
            .event(SecurityEventType::SuspiciousActivity)
            .with_metadata("description", description);
        if let Some(user_id) = user_id {
            event = event.with_user(user_id);
        }
        if let Some(email) = email {
            event = event.with_email(email);
        }
        self.log(event);
    }

    pub fn session_expired(&self, user_id: &str) {
        self.log(self.event(SecurityEventType::SessionExpired).with_user(user_id));
    }
}

fn trace_event(event: &SecurityEvent) {
    let user_id = event.user_id.as_deref().unwrap_or("-");
    let email = event.email.as_deref().unwrap_or("-");

    match event.severity {
        Severity::Low => debug!(event_type = %event.event_type, user_id, email, "Security event"),
        Severity::Medium => info!(event_type = %event.event_type, user_id, email, "Security event"),
        Severity::High => warn!(event_type = %event.event_type, user_id, email, "Security event"),
        Severity::Critical => {
            error!(event_type = %event.event_type, user_id, email, "Security event")
        }
    }
}
