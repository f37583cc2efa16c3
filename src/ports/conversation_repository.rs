//! Conversation repository port.
//!
//! Persists practice conversations, their messages, and the end-of-session
//! commit that stores the feedback summary together with its record.
//!
//! # Design
//!
//! - **Append-only messages**: timestamps never go backwards within a conversation
//! - **Atomic completion**: the ended conversation and its feedback record
//!   are written in one call, or not at all

use async_trait::async_trait;

use crate::domain::feedback::FeedbackRecord;
use crate::domain::foundation::{ConversationId, DomainError};
use crate::domain::practice::{Conversation, Message};

/// Repository port for practice conversations.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Save a new conversation.
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Find a conversation by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError>;

    /// Append a message to its conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    /// - `ValidationFailed` if the timestamp precedes the last stored message
    async fn append_message(&self, message: &Message) -> Result<(), DomainError>;

    /// Persist an ended conversation together with its feedback record.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    /// - `ConversationEnded` if feedback was already stored for it
    async fn complete(
        &self,
        conversation: &Conversation,
        record: &FeedbackRecord,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ConversationRepository) {}
    }
}
