//! StartConversationHandler - Command handler for opening a practice conversation.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, ScenarioId, Timestamp, UserId,
};
use crate::domain::practice::Conversation;
use crate::ports::{ConversationRepository, ScenarioRepository};

use super::PracticeError;

/// Command to start a practice conversation.
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    pub user_id: UserId,
    pub scenario_id: ScenarioId,
}

/// Result of starting a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct StartConversationResult {
    pub conversation_id: ConversationId,
    pub start_time: Timestamp,
}

/// Handler for starting practice conversations.
pub struct StartConversationHandler {
    conversations: Arc<dyn ConversationRepository>,
    scenarios: Arc<dyn ScenarioRepository>,
}

impl StartConversationHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        scenarios: Arc<dyn ScenarioRepository>,
    ) -> Self {
        Self {
            conversations,
            scenarios,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, PracticeError> {
        let scenario = self
            .scenarios
            .find_by_id(&cmd.scenario_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ScenarioNotFound, "Scenario not found")
                    .with_detail("scenario_id", cmd.scenario_id.to_string())
            })?;

        let conversation = Conversation::start(cmd.user_id, scenario.id);
        self.conversations.save(&conversation).await?;

        tracing::info!(
            conversation_id = %conversation.id(),
            scenario_id = %scenario.id,
            "Practice conversation started"
        );

        Ok(StartConversationResult {
            conversation_id: *conversation.id(),
            start_time: *conversation.start_time(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::practice::{ConversationStatus, Scenario};

    fn handler(store: &InMemoryStore) -> StartConversationHandler {
        StartConversationHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn creates_active_conversation() {
        let store = InMemoryStore::new();
        let scenario = Scenario::new("Evaluate greetings", "Beginner", 60).unwrap();
        store.insert_scenario(scenario.clone()).await;

        let result = handler(&store)
            .handle(StartConversationCommand {
                user_id: UserId::new("learner").unwrap(),
                scenario_id: scenario.id,
            })
            .await
            .unwrap();

        let stored = ConversationRepository::find_by_id(&store, &result.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), ConversationStatus::Active);
        assert_eq!(stored.scenario_id(), &scenario.id);
    }

    #[tokio::test]
    async fn unknown_scenario_is_not_found() {
        let store = InMemoryStore::new();

        let result = handler(&store)
            .handle(StartConversationCommand {
                user_id: UserId::new("learner").unwrap(),
                scenario_id: ScenarioId::new(),
            })
            .await;

        assert!(matches!(result, Err(PracticeError::NotFound(_))));
    }
}
