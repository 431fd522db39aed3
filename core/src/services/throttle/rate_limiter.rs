//! Window-based rate limiter with optional lockout.
//!
//! Checking and recording are separate: `check_limit` answers "may I attempt?"
//! without consuming anything, `record_attempt` is called once an attempt has
//! failed. Window and lock expiry are evaluated lazily on access.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use tracing::{debug, info, warn};

use super::store::{AttemptStore, MemoryAttemptStore};
use crate::domain::entities::{deadline, AttemptRecord, RateLimitPolicy};
use crate::domain::value_objects::RateLimitDecision;
use crate::services::clock::{Clock, SystemClock};

/// Rate limiter owning its attempt store.
///
/// Construct one per composition root and share it through `Arc`; every
/// operation on a key runs under the store lock, so check-then-record sequences
/// from different threads cannot interleave within one call.
pub struct RateLimiter<S = MemoryAttemptStore>
where
    S: AttemptStore<AttemptRecord>,
{
    store: Mutex<S>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter<MemoryAttemptStore> {
    /// In-memory limiter driven by `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_store(MemoryAttemptStore::new(), clock)
    }

    /// In-memory limiter on the wall clock
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl<S> RateLimiter<S>
where
    S: AttemptStore<AttemptRecord>,
{
    pub fn with_store(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
        }
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check whether `identifier` may attempt the action governed by `policy`.
    ///
    /// Creates the record lazily and restarts an elapsed window, but never
    /// increments the counter.
    pub fn check_limit(&self, identifier: &str, policy: &RateLimitPolicy) -> RateLimitDecision {
        let key = policy.storage_key(identifier);
        let now = self.clock.now();
        let mut store = self.store();

        let mut record = store
            .get(&key)
            .unwrap_or_else(|| AttemptRecord::new(now, policy.window()));

        if let Some(locked_until) = record.active_lock(now) {
            debug!(
                key = %key,
                locked_until = %locked_until,
                "Rate limit check denied by active lock"
            );
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: locked_until,
                locked: true,
            };
        }

        if record.is_stale(now) {
            record.restart(now, policy.window());
        }

        let max_attempts = policy.max_attempts();
        let decision = RateLimitDecision {
            allowed: record.count < max_attempts,
            remaining: record.remaining(max_attempts),
            reset_at: record.window_reset_at,
            locked: false,
        };
        store.set(&key, record);

        debug!(
            key = %key,
            allowed = decision.allowed,
            remaining = decision.remaining,
            "Rate limit checked"
        );

        decision
    }

    /// Record one attempt for `identifier`.
    ///
    /// An elapsed window restarts the record first, lifting any lock it held.
    /// Once the count reaches `max_attempts` and `lock_duration` is given, the key
    /// is locked until `now + lock_duration`.
    pub fn record_attempt(
        &self,
        identifier: &str,
        policy: &RateLimitPolicy,
        lock_duration: Option<Duration>,
    ) {
        let key = policy.storage_key(identifier);
        let now = self.clock.now();
        let mut store = self.store();

        let mut record = store
            .get(&key)
            .unwrap_or_else(|| AttemptRecord::new(now, policy.window()));

        if record.window_elapsed(now) || record.is_stale(now) {
            record.restart(now, policy.window());
        }

        record.count = record.count.saturating_add(1);

        if record.count >= policy.max_attempts() {
            if let Some(duration) = lock_duration {
                let locked_until = deadline(now, duration);
                record.locked_until = Some(locked_until);
                warn!(
                    key = %key,
                    attempts = record.count,
                    locked_until = %locked_until,
                    "Attempt limit reached, key locked"
                );
            }
        }

        debug!(
            key = %key,
            attempts = record.count,
            max_attempts = policy.max_attempts(),
            "Attempt recorded"
        );
        store.set(&key, record);
    }

    /// Forget all attempts and any lock for `identifier` under `policy`
    pub fn reset(&self, identifier: &str, policy: &RateLimitPolicy) {
        let key = policy.storage_key(identifier);
        self.store().delete(&key);
        info!(key = %key, "Rate limit reset");
    }

    /// Drop every record
    pub fn clear(&self) {
        let mut store = self.store();
        let dropped = store.len();
        store.clear();
        info!(dropped, "Rate limiter cleared");
    }

    /// Current record for `identifier`, as stored (expiry not applied)
    pub fn peek(&self, identifier: &str, policy: &RateLimitPolicy) -> Option<AttemptRecord> {
        self.store().get(&policy.storage_key(identifier))
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.store().len()
    }

    /// Remove records that any later access would restart anyway: elapsed
    /// window without a lock, or an expired lock
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = self.store().retain(&mut |_, record| !record.is_stale(now));
        if removed > 0 {
            info!(removed, "Swept stale rate limit records");
        }
        removed
    }
}
