//! Practice conversation command and query handlers.
//!
//! Covers the conversation lifecycle: start, record messages, end with
//! feedback synthesis, and read the stored feedback back.

mod end_conversation;
mod error;
mod get_feedback;
mod record_message;
mod start_conversation;

pub use end_conversation::{EndConversationCommand, EndConversationHandler, EndConversationResult};
pub use error::PracticeError;
pub use get_feedback::{FeedbackView, GetFeedbackHandler, GetFeedbackQuery};
pub use record_message::{RecordMessageCommand, RecordMessageHandler, RecordMessageResult};
pub use start_conversation::{
    StartConversationCommand, StartConversationHandler, StartConversationResult,
};

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, UserId};
use crate::domain::practice::Conversation;
use crate::ports::ConversationRepository;

/// Loads a conversation and checks that `user_id` owns it.
async fn load_owned_conversation(
    repo: &dyn ConversationRepository,
    conversation_id: &ConversationId,
    user_id: &UserId,
) -> Result<Conversation, PracticeError> {
    let conversation = repo.find_by_id(conversation_id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
            .with_detail("conversation_id", conversation_id.to_string())
    })?;

    if !conversation.is_owned_by(user_id) {
        tracing::warn!(
            conversation_id = %conversation_id,
            user_id = %user_id,
            "Rejected access to another user's conversation"
        );
        return Err(PracticeError::Forbidden);
    }

    Ok(conversation)
}
