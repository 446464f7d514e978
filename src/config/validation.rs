//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Validate value ranges (port parses, timeouts non-zero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic violation found in a parsed [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The port resolved to an empty string.
    #[error("port must not be empty")]
    EmptyPort,

    /// The port is not a valid TCP port number.
    #[error("port {0:?} is not a valid TCP port")]
    InvalidPort(String),

    /// A timeout was configured as zero.
    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port.is_empty() {
        errors.push(ValidationError::EmptyPort);
    } else if config.port.parse::<u16>().is_err() {
        errors.push(ValidationError::InvalidPort(config.port.clone()));
    }

    if config.timeouts.read_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("read"));
    }
    if config.timeouts.write_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("write"));
    }
    if config.timeouts.idle_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("idle"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
