//! Configuration module with business-specific sub-modules
//!
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Throttling of authentication actions, account lockout and sweeping

pub mod environment;
pub mod rate_limit;

use serde::{Deserialize, Serialize};

use crate::utils::validation::{Validate, ValidationErrors};

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{AccountLockoutSettings, ActionLimit, RateLimitConfig, SweepSettings};

/// Complete configuration of the throttling stack
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Standard limits with development logging; used when no environment is named
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            rate_limit: RateLimitConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            rate_limit: RateLimitConfig::production(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Profile defaults for an environment, without environment overrides
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => Self {
                environment: Environment::Staging,
                rate_limit: RateLimitConfig::default(),
                logging: LoggingConfig::for_environment(Environment::Staging),
            },
        }
    }

    /// Profile for a detected environment; standard limits when none was named
    pub fn for_detected(env: Option<Environment>) -> Self {
        env.map(Self::for_environment).unwrap_or_default()
    }

    /// Load configuration from environment variables.
    ///
    /// Picks the profile from `ENVIRONMENT`, then applies `THROTTLE_*` and
    /// `LOG_LEVEL` overrides and validates the result. The lenient development
    /// limits only apply when development is named explicitly.
    pub fn from_env() -> Result<Self, ValidationErrors> {
        let mut config = Self::for_detected(Environment::detect());
        config.rate_limit = config.rate_limit.with_env_overrides()?;
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        config.rate_limit.validate()?;
        Ok(config)
    }

    /// Read `.env` and the environment specific dotenv file, then load from the environment
    pub fn load() -> Result<Self, ValidationErrors> {
        dotenvy::dotenv().ok();
        dotenvy::from_filename(Environment::from_env().env_file()).ok();
        Self::from_env()
    }
}
