//! Value objects returned by the throttling services.

pub mod throttle;

pub use throttle::{FailedAttemptOutcome, LockoutInfo, RateLimitDecision, ThrottleState};
