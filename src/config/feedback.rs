//! Feedback pipeline tunables

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::DialogicSettings;
use crate::domain::feedback::SuggestionConfig;

/// Limits and model parameters for feedback synthesis and dialogic sessions
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    /// Upper bound on one synthesis call, in seconds
    #[serde(default = "default_synthesis_timeout")]
    pub synthesis_timeout_secs: u64,

    /// Feedback sections that contribute suggestions
    #[serde(default = "default_section_limit")]
    pub suggestion_section_limit: usize,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Recent dialogic messages sent with each turn
    #[serde(default = "default_context_limit")]
    pub context_message_limit: usize,

    /// Feedback sections named in the welcome message
    #[serde(default = "default_section_limit")]
    pub welcome_section_limit: usize,

    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,
}

impl FeedbackConfig {
    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.synthesis_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        for (name, value) in [
            ("suggestion_section_limit", self.suggestion_section_limit),
            ("max_suggestions", self.max_suggestions),
            ("context_message_limit", self.context_message_limit),
            ("welcome_section_limit", self.welcome_section_limit),
        ] {
            if value == 0 {
                return Err(ValidationError::ZeroLimit(name));
            }
        }
        if self.reply_max_tokens == 0 {
            return Err(ValidationError::ZeroLimit("reply_max_tokens"));
        }
        if !(0.0..=2.0).contains(&self.reply_temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            synthesis_timeout_secs: default_synthesis_timeout(),
            suggestion_section_limit: default_section_limit(),
            max_suggestions: default_max_suggestions(),
            context_message_limit: default_context_limit(),
            welcome_section_limit: default_section_limit(),
            reply_max_tokens: default_reply_max_tokens(),
            reply_temperature: default_reply_temperature(),
        }
    }
}

impl From<&FeedbackConfig> for SuggestionConfig {
    fn from(config: &FeedbackConfig) -> Self {
        SuggestionConfig {
            section_limit: config.suggestion_section_limit,
            max_suggestions: config.max_suggestions,
        }
    }
}

impl From<&FeedbackConfig> for DialogicSettings {
    fn from(config: &FeedbackConfig) -> Self {
        DialogicSettings {
            context_message_limit: config.context_message_limit,
            welcome_section_limit: config.welcome_section_limit,
            reply_max_tokens: config.reply_max_tokens,
            reply_temperature: config.reply_temperature,
        }
    }
}

fn default_synthesis_timeout() -> u64 {
    120
}

fn default_section_limit() -> usize {
    3
}

fn default_max_suggestions() -> usize {
    6
}

fn default_context_limit() -> usize {
    10
}

fn default_reply_max_tokens() -> u32 {
    350
}

fn default_reply_temperature() -> f32 {
    0.7
}
