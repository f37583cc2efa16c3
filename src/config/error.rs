//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI base URL")]
    InvalidBaseUrl,

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("AI max_retries must be at most {0}")]
    TooManyRetries(u32),

    #[error("Reply temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
