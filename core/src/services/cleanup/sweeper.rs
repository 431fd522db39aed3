//! Background sweeper for throttling state
//!
//! Expiry is evaluated lazily on access, so identifiers that are never seen
//! again would stay in memory forever. The sweeper bounds that by dropping
//! records any later access would discard anyway.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use dk_shared::SweepSettings;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::entities::{AttemptRecord, LockoutRecord};
use crate::services::lockout::AccountRecoveryManager;
use crate::services::throttle::{AttemptStore, RateLimiter};

/// Component holding records that can expire
pub trait Sweep: Send + Sync {
    /// Name used in logs and sweep results
    fn name(&self) -> &'static str;

    /// Remove expired records, returning how many were removed
    fn sweep_expired(&self) -> usize;
}

impl<S> Sweep for RateLimiter<S>
where
    S: AttemptStore<AttemptRecord>,
{
    fn name(&self) -> &'static str {
        "rate_limiter"
    }

    fn sweep_expired(&self) -> usize {
        RateLimiter::sweep_expired(self)
    }
}

impl<S> Sweep for AccountRecoveryManager<S>
where
    S: AttemptStore<LockoutRecord>,
{
    fn name(&self) -> &'static str {
        "account_recovery"
    }

    fn sweep_expired(&self) -> usize {
        AccountRecoveryManager::sweep_expired(self)
    }
}

/// Configuration for the throttle sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Whether the background task runs at all
    pub enabled: bool,
    /// Time between sweeps
    pub interval: StdDuration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self::from_settings(&SweepSettings::default())
    }
}

impl SweeperConfig {
    pub fn from_settings(settings: &SweepSettings) -> Self {
        Self {
            enabled: settings.enabled,
            interval: StdDuration::from_secs(settings.interval_seconds),
        }
    }
}

/// Runs `sweep_expired` over every registered component
pub struct ThrottleSweeper {
    targets: Vec<Arc<dyn Sweep>>,
    config: SweeperConfig,
}

impl ThrottleSweeper {
    pub fn new(config: SweeperConfig) -> Self {
        Self {
            targets: Vec::new(),
            config,
        }
    }

    /// Register a component to sweep
    pub fn with_target(mut self, target: Arc<dyn Sweep>) -> Self {
        self.targets.push(target);
        self
    }

    pub fn config(&self) -> &SweeperConfig {
        &self.config
    }

    /// Run a single sweep over every target
    pub fn run_once(&self) -> SweepResult {
        let mut result = SweepResult::default();

        for target in &self.targets {
            let removed = target.sweep_expired();
            debug!(target = target.name(), removed, "Sweep target finished");
            result.removed.push((target.name(), removed));
        }

        if result.total_removed() > 0 {
            info!(
                removed = result.total_removed(),
                targets = self.targets.len(),
                "Throttle sweep completed"
            );
        }

        result
    }

    /// Start the sweeper as a background task
    ///
    /// Returns `None` when sweeping is disabled or the interval is zero. Must
    /// be called from within a tokio runtime.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Throttle sweeper is disabled");
            return None;
        }
        if self.config.interval.is_zero() {
            warn!("Throttle sweeper interval is zero, not starting");
            return None;
        }

        let handle = tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval.as_secs(),
                "Throttle sweeper started"
            );

            let mut interval_timer = tokio::time::interval(self.config.interval);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval_timer.tick().await;
                self.run_once();
            }
        });

        Some(handle)
    }
}

/// Result of one sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Records removed per target, in registration order
    pub removed: Vec<(&'static str, usize)>,
}

impl SweepResult {
    pub fn total_removed(&self) -> usize {
        self.removed.iter().map(|(_, count)| count).sum()
    }
}
