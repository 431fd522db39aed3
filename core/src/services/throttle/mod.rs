//! Attempt throttling for authentication actions
//!
//! - `store` - keyed record storage
//! - `rate_limiter` - window counting with optional lockout
//! - `policies` - predefined per-action policy table
//! - `login` - call-site helpers producing user-facing messages
//! - `messages` - countdown formatting

mod login;
mod messages;
mod policies;
mod rate_limiter;
mod store;

#[cfg(test)]
mod tests;

pub use login::ActionCheck;
pub use messages::{format_minutes, lockout_message, minutes_until, throttled_message};
pub use policies::{ActionPolicy, ThrottlePolicies, ThrottledAction};
pub use rate_limiter::RateLimiter;
pub use store::{AttemptStore, MemoryAttemptStore};
