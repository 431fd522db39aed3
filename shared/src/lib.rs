//! Shared configuration and utilities for the Dukan server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (environment, logging, throttling)
//! - Validation utilities for configuration and throttled identifiers

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AccountLockoutSettings, ActionLimit, AppConfig, Environment, LogFormat, LoggingConfig,
    RateLimitConfig, SweepSettings,
};
pub use utils::validation::{validators, Validate, ValidationError, ValidationErrors};
