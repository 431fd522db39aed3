//! Domain entities representing throttling state and security events.

pub mod attempt_record;
pub mod lockout_record;
pub mod rate_limit_policy;
pub mod security_event;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use attempt_record::{deadline, AttemptRecord};
pub use lockout_record::LockoutRecord;
pub use rate_limit_policy::{duration_from_secs, RateLimitPolicy};
pub use security_event::{SecurityEvent, SecurityEventType, Severity};
