//! Throttling services and their composition.

pub mod audit;
pub mod auth;
pub mod cleanup;
pub mod clock;
pub mod lockout;
pub mod throttle;

// Re-export commonly used types
pub use audit::{SecurityEventLog, SecurityLogConfig};
pub use auth::LoginGuard;
pub use cleanup::{Sweep, SweepResult, SweeperConfig, ThrottleSweeper};
pub use clock::{Clock, ManualClock, SystemClock};
pub use lockout::{AccountLockoutConfig, AccountLockoutConfigUpdate, AccountRecoveryManager};
pub use throttle::{
    ActionCheck, ActionPolicy, AttemptStore, MemoryAttemptStore, RateLimiter, ThrottlePolicies,
    ThrottledAction,
};
