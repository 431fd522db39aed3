//! Environment detection and logging configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Deployment environment the throttling stack runs in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Environment named by `ENVIRONMENT`, `ENV` or `RUST_ENV`, if any is set and valid
    pub fn detect() -> Option<Self> {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .or_else(|_| env::var("RUST_ENV"))
            .ok()
            .and_then(|value| value.parse().ok())
    }

    /// Resolve the environment, falling back to development when unknown or missing
    pub fn from_env() -> Self {
        Self::detect().unwrap_or_default()
    }

    /// Name of the dotenv file holding overrides for this environment
    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Development => ".env.development",
            Environment::Staging => ".env.staging",
            Environment::Production => ".env.production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration consumed by the tracing bootstrap
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error or a full
    /// `EnvFilter` directive). `RUST_LOG` takes precedence when set.
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Enable ANSI colors (terminal only)
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Include the event target (module path) in each line
    #[serde(default = "default_with_target")]
    pub with_target: bool,

    /// Include file and line of the callsite
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::default(),
            colored: default_colored(),
            with_target: default_with_target(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Logging defaults for the given environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                colored: true,
                with_target: true,
                source_location: true,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Full,
                colored: false,
                with_target: true,
                source_location: false,
            },
            Environment::Production => Self {
                level: String::from("warn"),
                format: LogFormat::Compact,
                colored: false,
                with_target: false,
                source_location: false,
            },
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human oriented
    #[default]
    Pretty,
    /// Single line with all fields
    Full,
    /// Abbreviated single line
    Compact,
}

fn default_colored() -> bool {
    true
}

fn default_with_target() -> bool {
    true
}
