//! # Dukan Core
//!
//! Authentication throttling for the Dukan backend: per-action rate limiting
//! with optional lockout, account lockout after repeated failed logins, a
//! security event log and the login guard composing them.

pub mod domain;
pub mod errors;
pub mod services;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
