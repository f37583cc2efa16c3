//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the `config`
//! and `dotenvy` crates. Variables use the `PRACTICE_FEEDBACK` prefix and `__`
//! between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use practice_feedback::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod error;
mod feedback;
mod logging;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use feedback::FeedbackConfig;
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Model provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Synthesis timeout, suggestion and dialogic limits
    #[serde(default)]
    pub feedback: FeedbackConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PRACTICE_FEEDBACK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PRACTICE_FEEDBACK__AI__OPENAI_API_KEY=sk-...` -> `ai.openai_api_key`
    /// - `PRACTICE_FEEDBACK__FEEDBACK__MAX_SUGGESTIONS=4` -> `feedback.max_suggestions = 4`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PRACTICE_FEEDBACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a missing API key, a zero limit, a bad
    /// timeout or an unparseable log level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.feedback.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
