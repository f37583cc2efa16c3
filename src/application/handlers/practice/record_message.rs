//! RecordMessageHandler - Command handler for appending to a practice transcript.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{ConversationId, MessageId, Timestamp, UserId};
use crate::domain::practice::{Message, MessageRole};
use crate::ports::ConversationRepository;

use super::{load_owned_conversation, PracticeError};

/// Command to record one message of a practice conversation.
#[derive(Debug, Clone)]
pub struct RecordMessageCommand {
    pub user_id: UserId,
    pub conversation_id: ConversationId,
    pub role: MessageRole,
    pub content: String,
    /// Defaults to now.
    pub timestamp: Option<Timestamp>,
}

/// Result of recording a message.
#[derive(Debug, Clone, Serialize)]
pub struct RecordMessageResult {
    pub message_id: MessageId,
    pub timestamp: Timestamp,
}

/// Handler for recording practice messages.
pub struct RecordMessageHandler {
    conversations: Arc<dyn ConversationRepository>,
}

impl RecordMessageHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>) -> Self {
        Self { conversations }
    }

    pub async fn handle(&self, cmd: RecordMessageCommand) -> Result<RecordMessageResult, PracticeError> {
        if cmd.content.trim().is_empty() {
            return Err(PracticeError::EmptyMessage);
        }

        let conversation =
            load_owned_conversation(self.conversations.as_ref(), &cmd.conversation_id, &cmd.user_id)
                .await?;
        if !conversation.is_active() {
            return Err(PracticeError::ConversationEnded);
        }

        let timestamp = cmd.timestamp.unwrap_or_else(Timestamp::now);
        let message = Message::at(cmd.conversation_id, cmd.role, cmd.content, timestamp)?;
        self.conversations.append_message(&message).await?;

        tracing::debug!(
            conversation_id = %cmd.conversation_id,
            role = %message.role,
            "Practice message recorded"
        );

        Ok(RecordMessageResult {
            message_id: message.id,
            timestamp,
        })
    }
}
