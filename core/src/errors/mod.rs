//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{ThrottleError, ValidationError};

use dk_shared::ValidationErrors;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ValidationErrors),

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Throttle(#[from] ThrottleError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;
