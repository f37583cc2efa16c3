//! Errors shared by the dialogic feedback handlers.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::AIError;

/// Errors returned by dialogic feedback handlers.
#[derive(Debug, Clone, Error)]
pub enum DialogicError {
    /// Feedback record or conversation was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller does not own the feedback session.
    #[error("Forbidden: user does not own this feedback session")]
    Forbidden,

    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyMessage,

    /// Session was ended and accepts no more messages.
    #[error("Feedback session has ended")]
    SessionEnded,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Model credentials are missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model call failed or returned nothing usable.
    #[error("AI provider error: {0}")]
    Upstream(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<DomainError> for DialogicError {
    fn from(err: DomainError) -> Self {
        if err.is_not_found() {
            return DialogicError::NotFound(err.message);
        }
        match err.code {
            ErrorCode::Forbidden => DialogicError::Forbidden,
            ErrorCode::SessionEnded => DialogicError::SessionEnded,
            ErrorCode::EmptyField => DialogicError::EmptyMessage,
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidStateTransition
            | ErrorCode::ConversationEnded => DialogicError::InvalidState(err.message),
            ErrorCode::ConfigurationMissing => DialogicError::Configuration(err.message),
            ErrorCode::AIProviderError => DialogicError::Upstream(err.message),
            _ => DialogicError::Repository(err.message),
        }
    }
}

impl From<ValidationError> for DialogicError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AIError> for DialogicError {
    fn from(err: AIError) -> Self {
        if err.is_configuration() {
            DialogicError::Configuration(err.to_string())
        } else {
            DialogicError::Upstream(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ended_maps_to_its_own_variant() {
        let err = DomainError::new(ErrorCode::SessionEnded, "ended");
        assert!(matches!(DialogicError::from(err), DialogicError::SessionEnded));
    }

    #[test]
    fn empty_field_maps_to_empty_message() {
        let err = ValidationError::empty_field("content");
        assert!(matches!(DialogicError::from(err), DialogicError::EmptyMessage));
    }

    #[test]
    fn missing_credentials_is_configuration() {
        let err = AIError::missing_credentials("openai");
        assert!(matches!(DialogicError::from(err), DialogicError::Configuration(_)));
    }

    #[test]
    fn unavailable_provider_is_upstream() {
        let err = AIError::unavailable("down");
        assert!(matches!(DialogicError::from(err), DialogicError::Upstream(_)));
    }

    #[test]
    fn not_found_codes_collapse() {
        let err = DomainError::new(ErrorCode::FeedbackNotFound, "missing");
        assert!(matches!(DialogicError::from(err), DialogicError::NotFound(m) if m == "missing"));
        let err = DomainError::new(ErrorCode::ConversationNotFound, "gone");
        assert!(matches!(DialogicError::from(err), DialogicError::NotFound(_)));
    }

    #[test]
    fn storage_failures_are_repository_errors() {
        let err = DomainError::new(ErrorCode::DatabaseError, "locked");
        assert!(matches!(DialogicError::from(err), DialogicError::Repository(m) if m == "locked"));
    }
}
