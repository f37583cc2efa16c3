//! Feedback repository port.
//!
//! Persists feedback records and the messages of their dialogic sessions.
//! Records are created through `ConversationRepository::complete`; this port
//! only reads and updates them.

use async_trait::async_trait;

use crate::domain::feedback::{FeedbackMessage, FeedbackRecord};
use crate::domain::foundation::{ConversationId, DomainError, FeedbackRecordId};

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Find a feedback record by its ID.
    async fn find_by_id(&self, id: &FeedbackRecordId) -> Result<Option<FeedbackRecord>, DomainError>;

    /// Find the feedback record of a practice conversation.
    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<FeedbackRecord>, DomainError>;

    /// Dialogic messages of a record, oldest first.
    async fn messages(&self, id: &FeedbackRecordId) -> Result<Vec<FeedbackMessage>, DomainError>;

    /// Update the record's dialogic state.
    ///
    /// # Errors
    ///
    /// - `FeedbackNotFound` if the record doesn't exist
    async fn update(&self, record: &FeedbackRecord) -> Result<(), DomainError>;

    /// Update the record and append messages in one atomic step.
    ///
    /// # Errors
    ///
    /// - `FeedbackNotFound` if the record doesn't exist
    async fn append_messages(
        &self,
        record: &FeedbackRecord,
        messages: &[FeedbackMessage],
    ) -> Result<(), DomainError>;
}
