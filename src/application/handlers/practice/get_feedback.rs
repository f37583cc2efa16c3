//! GetFeedbackHandler - Query handler for a conversation's stored feedback.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::feedback::{FeedbackVersion, StructuredFeedback};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, FeedbackRecordId, UserId,
};
use crate::ports::{ConversationRepository, FeedbackRepository};

use super::{load_owned_conversation, PracticeError};

/// Query for the feedback of an ended conversation.
#[derive(Debug, Clone)]
pub struct GetFeedbackQuery {
    pub user_id: UserId,
    pub conversation_id: ConversationId,
}

/// Stored feedback view.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackView {
    pub feedback_record_id: FeedbackRecordId,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_json: Option<StructuredFeedback>,
    pub feedback_version: FeedbackVersion,
    pub model: String,
    pub is_active: bool,
}

/// Handler for reading stored feedback.
pub struct GetFeedbackHandler {
    conversations: Arc<dyn ConversationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl GetFeedbackHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        feedback: Arc<dyn FeedbackRepository>,
    ) -> Self {
        Self {
            conversations,
            feedback,
        }
    }

    pub async fn handle(&self, query: GetFeedbackQuery) -> Result<FeedbackView, PracticeError> {
        load_owned_conversation(self.conversations.as_ref(), &query.conversation_id, &query.user_id)
            .await?;

        let record = self
            .feedback
            .find_by_conversation(&query.conversation_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::FeedbackNotFound, "No feedback for this conversation")
                    .with_detail("conversation_id", query.conversation_id.to_string())
            })?;

        Ok(FeedbackView {
            feedback_record_id: *record.id(),
            summary: record.summary().to_string(),
            feedback_json: record.structured().cloned(),
            feedback_version: record.version(),
            model: record.model().to_string(),
            is_active: record.is_active(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::feedback::{DecodedFeedback, FeedbackRecord};
    use crate::domain::foundation::{ScenarioId, Timestamp};
    use crate::domain::practice::{Conversation, Scenario};

    fn learner() -> UserId {
        UserId::new("learner").unwrap()
    }

    async fn setup() -> (InMemoryStore, GetFeedbackHandler, Conversation) {
        let store = InMemoryStore::new();
        let conversation = Conversation::start(learner(), ScenarioId::new());
        store.save(&conversation).await.unwrap();
        let handler = GetFeedbackHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (store, handler, conversation)
    }

    fn query(conversation: &Conversation) -> GetFeedbackQuery {
        GetFeedbackQuery {
            user_id: learner(),
            conversation_id: *conversation.id(),
        }
    }

    #[tokio::test]
    async fn returns_stored_feedback() {
        let (store, handler, mut conversation) = setup().await;
        let scenario = Scenario::new("x", "Beginner", 0).unwrap();
        conversation.end(Timestamp::now(), &scenario).unwrap();
        let record = FeedbackRecord::new(
            *conversation.id(),
            learner(),
            DecodedFeedback::PlainText("Solid effort".into()),
            "mock-model-1",
        );
        store.complete(&conversation, &record).await.unwrap();

        let view = handler.handle(query(&conversation)).await.unwrap();

        assert_eq!(view.feedback_record_id, *record.id());
        assert_eq!(view.summary, "Solid effort");
        assert_eq!(view.feedback_version, FeedbackVersion::FallbackText);
        assert_eq!(view.model, "mock-model-1");
        assert!(view.feedback_json.is_none());
        assert!(view.is_active);
    }

    #[tokio::test]
    async fn missing_feedback_is_not_found() {
        let (_, handler, conversation) = setup().await;
        let result = handler.handle(query(&conversation)).await;
        assert!(matches!(result, Err(PracticeError::NotFound(_))));
    }

    #[tokio::test]
    async fn other_user_is_forbidden() {
        let (_, handler, conversation) = setup().await;
        let mut q = query(&conversation);
        q.user_id = UserId::new("intruder").unwrap();

        let result = handler.handle(q).await;

        assert!(matches!(result, Err(PracticeError::Forbidden)));
    }
}
