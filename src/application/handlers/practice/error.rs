//! Errors shared by the practice conversation handlers.

use thiserror::Error;

use crate::application::SynthesisError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::AIError;

/// Errors returned by practice conversation handlers.
#[derive(Debug, Clone, Error)]
pub enum PracticeError {
    /// Conversation, scenario or feedback was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller does not own the conversation.
    #[error("Forbidden: user does not own this conversation")]
    Forbidden,

    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyMessage,

    /// Conversation has already ended.
    #[error("Conversation has already ended")]
    ConversationEnded,

    /// Operation is not valid for the conversation's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Feedback instructions or model credentials are missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model call failed.
    #[error("AI provider error: {0}")]
    Upstream(String),

    /// Persistence failed.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<DomainError> for PracticeError {
    fn from(err: DomainError) -> Self {
        if err.is_not_found() {
            return PracticeError::NotFound(err.message);
        }
        match err.code {
            ErrorCode::Forbidden => PracticeError::Forbidden,
            ErrorCode::ConversationEnded => PracticeError::ConversationEnded,
            ErrorCode::EmptyField => PracticeError::EmptyMessage,
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidStateTransition
            | ErrorCode::SessionEnded => PracticeError::InvalidState(err.message),
            ErrorCode::ConfigurationMissing => PracticeError::Configuration(err.message),
            ErrorCode::AIProviderError => PracticeError::Upstream(err.message),
            _ => PracticeError::Repository(err.message),
        }
    }
}

impl From<ValidationError> for PracticeError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AIError> for PracticeError {
    fn from(err: AIError) -> Self {
        SynthesisError::from(err).into()
    }
}

impl From<SynthesisError> for PracticeError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Configuration(message) => PracticeError::Configuration(message),
            SynthesisError::Upstream(source) => PracticeError::Upstream(source.to_string()),
        }
    }
}
