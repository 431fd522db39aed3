//! Security event log for authentication and throttling activity.

mod service;

pub use service::{SecurityEventLog, SecurityLogConfig};

#[cfg(test)]
mod tests;
