//! ListMessagesHandler - Query handler for dialogic session history.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::feedback::{FeedbackMessage, FeedbackVersion};
use crate::domain::foundation::{FeedbackRecordId, UserId};
use crate::ports::FeedbackRepository;

use super::{load_owned_record, DialogicError};

/// Query for a dialogic session's messages.
#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub user_id: UserId,
    pub feedback_record_id: FeedbackRecordId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListMessagesResult {
    pub messages: Vec<FeedbackMessage>,
    pub is_active: bool,
    pub feedback_version: FeedbackVersion,
}

/// Handler for listing dialogic messages.
pub struct ListMessagesHandler {
    feedback: Arc<dyn FeedbackRepository>,
}

impl ListMessagesHandler {
    pub fn new(feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self { feedback }
    }

    pub async fn handle(&self, query: ListMessagesQuery) -> Result<ListMessagesResult, DialogicError> {
        let record =
            load_owned_record(self.feedback.as_ref(), &query.feedback_record_id, &query.user_id)
                .await?;
        let messages = self.feedback.messages(record.id()).await?;

        Ok(ListMessagesResult {
            messages,
            is_active: record.is_active(),
            feedback_version: record.version(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::dialogic::fixtures::{ended_conversation, learner};
    use crate::domain::feedback::DecodedFeedback;

    #[tokio::test]
    async fn lists_history_with_session_state() {
        let store = InMemoryStore::new();
        let record = ended_conversation(&store, DecodedFeedback::PlainText("Good.".into())).await;
        let welcome = FeedbackMessage::assistant(*record.id(), "Welcome").unwrap();
        store.append_messages(&record, &[welcome.clone()]).await.unwrap();

        let result = ListMessagesHandler::new(Arc::new(store))
            .handle(ListMessagesQuery {
                user_id: learner(),
                feedback_record_id: *record.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.messages, vec![welcome]);
        assert!(result.is_active);
        assert_eq!(result.feedback_version, FeedbackVersion::FallbackText);
    }

    #[tokio::test]
    async fn other_user_is_forbidden() {
        let store = InMemoryStore::new();
        let record = ended_conversation(&store, DecodedFeedback::PlainText("Good.".into())).await;

        let result = ListMessagesHandler::new(Arc::new(store))
            .handle(ListMessagesQuery {
                user_id: UserId::new("intruder").unwrap(),
                feedback_record_id: *record.id(),
            })
            .await;

        assert!(matches!(result, Err(DialogicError::Forbidden)));
    }
}
