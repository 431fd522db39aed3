//! Account lockout after repeated failed logins.

mod config;
mod manager;

#[cfg(test)]
mod tests;

pub use config::{AccountLockoutConfig, AccountLockoutConfigUpdate};
pub use manager::AccountRecoveryManager;
