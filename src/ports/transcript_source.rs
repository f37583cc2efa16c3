//! Transcript source port.
//!
//! Supplies the ordered message history of a practice conversation. The
//! history is re-derived from storage on every call, so it is restartable and
//! stable for a conversation that no longer changes.

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError};
use crate::domain::practice::Transcript;

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Ordered `{role, content}` history, oldest first.
    ///
    /// Messages sharing a timestamp keep insertion order. An unknown
    /// conversation yields an empty transcript.
    async fn history(&self, conversation_id: &ConversationId) -> Result<Transcript, DomainError>;
}
