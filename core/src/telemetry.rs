//! Tracing bootstrap for hosts embedding the throttling services.

use dk_shared::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::errors::{DomainError, DomainResult};

/// Filter from `RUST_LOG` when set and valid, otherwise from `config.level`
pub fn env_filter(config: &LoggingConfig) -> DomainResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|err| DomainError::Internal {
        message: format!("Invalid log filter '{}': {}", config.level, err),
    })
}

/// Install the global fmt subscriber.
///
/// Fails when the filter is invalid or a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> DomainResult<()> {
    let filter = env_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_target(config.with_target)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(|err| DomainError::Internal {
        message: format!("Failed to install tracing subscriber: {}", err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "dk_core=loudest".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            env_filter(&config),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_init_tracing_only_once() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
