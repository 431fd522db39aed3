//! Account recovery manager for login brute force protection
//!
//! Counts failed logins per account identifier and locks the account for a
//! fixed duration once the configured maximum is reached. Locks expire
//! lazily: the record is purged the next time the account is looked at.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::config::{AccountLockoutConfig, AccountLockoutConfigUpdate};
use crate::domain::entities::{deadline, LockoutRecord};
use crate::domain::value_objects::{FailedAttemptOutcome, LockoutInfo};
use crate::errors::ValidationError;
use crate::services::clock::{Clock, SystemClock};
use crate::services::throttle::{minutes_until, AttemptStore, MemoryAttemptStore};

/// Service tracking failed logins and account lockouts
pub struct AccountRecoveryManager<S = MemoryAttemptStore<LockoutRecord>>
where
    S: AttemptStore<LockoutRecord>,
{
    /// Lockout records keyed by account identifier
    lockouts: Mutex<S>,
    /// Live configuration; `configure` merges into it
    config: RwLock<AccountLockoutConfig>,
    clock: Arc<dyn Clock>,
}

impl AccountRecoveryManager<MemoryAttemptStore<LockoutRecord>> {
    /// Create a new in-memory manager
    pub fn new(config: AccountLockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_store(MemoryAttemptStore::new(), config, clock)
    }

    /// Create a manager with the default lockout policy on the wall clock
    pub fn with_defaults() -> Self {
        Self::new(AccountLockoutConfig::default(), Arc::new(SystemClock))
    }
}

impl<S> AccountRecoveryManager<S>
where
    S: AttemptStore<LockoutRecord>,
{
    pub fn with_store(store: S, config: AccountLockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            lockouts: Mutex::new(store),
            config: RwLock::new(config),
            clock,
        }
    }

    fn lockouts(&self) -> MutexGuard<'_, S> {
        self.lockouts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the live configuration
    pub fn config(&self) -> AccountLockoutConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge new policy values into the live configuration.
    ///
    /// Accounts already tracked keep their counts and locks; the new values
    /// apply from the next failed attempt on.
    pub fn configure(&self, update: AccountLockoutConfigUpdate) -> Result<(), ValidationError> {
        update.validate()?;

        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.merge(&update);

        info!(
            max_failed_attempts = config.max_failed_attempts,
            lockout_duration_seconds = config.lockout_duration.num_seconds(),
            reset_after_success = config.reset_after_success,
            "Account lockout policy reconfigured"
        );

        Ok(())
    }

    /// Record a failed login attempt
    ///
    /// # Arguments
    /// * `identifier` - Account identifier (email or user ID)
    ///
    /// # Returns
    /// * `locked = true, attempts_remaining = 0` with the lock expiry once the
    ///   count reaches `max_failed_attempts`
    /// * otherwise the number of attempts left before the lock
    pub fn record_failed_attempt(&self, identifier: &str) -> FailedAttemptOutcome {
        let config = self.config();
        let now = self.clock.now();
        let mut lockouts = self.lockouts();

        let mut record = lockouts.get(identifier).unwrap_or_default();

        if record.lock_expired_at(now) {
            record = LockoutRecord::default();
        }

        record.attempt_count = record.attempt_count.saturating_add(1);

        if record.attempt_count >= config.max_failed_attempts {
            let locked_until = deadline(now, config.lockout_duration);
            record.locked_until = Some(locked_until);
            lockouts.set(identifier, record.clone());

            warn!(
                identifier = identifier,
                attempts = record.attempt_count,
                locked_until = %locked_until,
                "Account locked due to failed authentication attempts"
            );

            return FailedAttemptOutcome {
                locked: true,
                attempts_remaining: 0,
                locked_until: Some(locked_until),
            };
        }

        let attempts_remaining = config.max_failed_attempts - record.attempt_count;
        lockouts.set(identifier, record.clone());

        warn!(
            identifier = identifier,
            attempts = record.attempt_count,
            max_attempts = config.max_failed_attempts,
            "Failed authentication attempt recorded"
        );

        FailedAttemptOutcome {
            locked: false,
            attempts_remaining,
            locked_until: None,
        }
    }

    /// Check if an account is currently locked
    ///
    /// An expired lock is purged from the store as a side effect.
    pub fn is_locked(&self, identifier: &str) -> bool {
        let now = self.clock.now();
        let mut lockouts = self.lockouts();

        let Some(record) = lockouts.get(identifier) else {
            return false;
        };

        if record.is_locked_at(now) {
            return true;
        }

        if record.lock_expired_at(now) {
            lockouts.delete(identifier);
            info!(identifier = identifier, "Account lock expired");
        }

        false
    }

    /// Lock status with the remaining time rounded up to whole minutes.
    ///
    /// Read-only: unlike [`Self::is_locked`] an expired lock is left in place.
    pub fn get_lockout_info(&self, identifier: &str) -> LockoutInfo {
        let now = self.clock.now();
        let lockouts = self.lockouts();

        match lockouts.get(identifier).and_then(|record| record.locked_until) {
            Some(locked_until) if now < locked_until => LockoutInfo {
                locked: true,
                locked_until: Some(locked_until),
                minutes_remaining: Some(minutes_until(now, locked_until)),
            },
            _ => LockoutInfo::unlocked(),
        }
    }

    /// Clear the failure history after a successful login.
    ///
    /// Does nothing unless `reset_after_success` is enabled. Returns whether a
    /// record was cleared.
    pub fn reset_lockout(&self, identifier: &str) -> bool {
        if !self.config().reset_after_success {
            debug!(identifier = identifier, "Lockout reset skipped by policy");
            return false;
        }

        let mut lockouts = self.lockouts();
        let existed = lockouts.get(identifier).is_some();
        lockouts.delete(identifier);

        if existed {
            info!(
                identifier = identifier,
                "Failed attempt counter reset after successful authentication"
            );
        }
        existed
    }

    /// Current failed attempt count, as stored
    pub fn failed_attempts(&self, identifier: &str) -> u32 {
        self.lockouts()
            .get(identifier)
            .map(|record| record.attempt_count)
            .unwrap_or(0)
    }

    /// Drop every tracked account
    pub fn clear_all(&self) {
        let mut lockouts = self.lockouts();
        let dropped = lockouts.len();
        lockouts.clear();
        info!(dropped, "All account lockouts cleared");
    }

    /// Number of accounts currently tracked
    pub fn tracked_accounts(&self) -> usize {
        self.lockouts().len()
    }

    /// Remove records whose lock has expired.
    ///
    /// Records that never reached a lock carry no expiry and are kept.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = self
            .lockouts()
            .retain(&mut |_, record| !record.lock_expired_at(now));
        if removed > 0 {
            info!(removed, "Swept expired account lockouts");
        }
        removed
    }
}
