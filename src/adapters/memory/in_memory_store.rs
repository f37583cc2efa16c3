//! In-memory implementation of the storage and directory ports.
//!
//! All tables sit behind one `RwLock`, so every port call is a single
//! atomic unit, including the multi-table `complete` and `append_messages`
//! commits. Writes against an ended conversation or dialogic session are
//! refused under the lock, so a caller holding a stale copy cannot reopen it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::feedback::{DialogicState, FeedbackMessage, FeedbackRecord};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, FeedbackRecordId, ScenarioId, UserId,
};
use crate::domain::practice::{Conversation, Message, Scenario, Transcript};
use crate::ports::{
    ConversationRepository, FeedbackRepository, LearnerDirectory, ScenarioRepository,
    TranscriptSource,
};

#[derive(Debug, Default)]
struct Tables {
    conversations: HashMap<ConversationId, Conversation>,
    messages: HashMap<ConversationId, Vec<Message>>,
    records: HashMap<FeedbackRecordId, FeedbackRecord>,
    record_by_conversation: HashMap<ConversationId, FeedbackRecordId>,
    feedback_messages: HashMap<FeedbackRecordId, Vec<FeedbackMessage>>,
    scenarios: HashMap<ScenarioId, Scenario>,
    first_names: HashMap<UserId, String>,
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scenario.
    pub async fn insert_scenario(&self, scenario: Scenario) {
        self.tables.write().await.scenarios.insert(scenario.id, scenario);
    }

    /// Registers a learner's first name.
    pub async fn insert_learner(&self, user_id: UserId, first_name: impl Into<String>) {
        self.tables
            .write()
            .await
            .first_names
            .insert(user_id, first_name.into());
    }

    /// Number of feedback records stored for a conversation (0 or 1).
    pub async fn feedback_count(&self, conversation_id: &ConversationId) -> usize {
        self.tables
            .read()
            .await
            .records
            .values()
            .filter(|r| r.conversation_id() == conversation_id)
            .count()
    }
}

fn conversation_not_found(id: &ConversationId) -> DomainError {
    DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
        .with_detail("conversation_id", id.to_string())
}

fn feedback_not_found(id: &FeedbackRecordId) -> DomainError {
    DomainError::new(ErrorCode::FeedbackNotFound, "Feedback record not found")
        .with_detail("feedback_record_id", id.to_string())
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables
            .conversations
            .insert(*conversation.id(), conversation.clone());
        tables.messages.entry(*conversation.id()).or_default();
        Ok(())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.tables.read().await.conversations.get(id).cloned())
    }

    async fn append_message(&self, message: &Message) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.conversations.get(&message.conversation_id) {
            Some(conversation) if conversation.is_active() => {}
            Some(_) => {
                return Err(DomainError::new(
                    ErrorCode::ConversationEnded,
                    "Conversation has already ended",
                )
                .with_detail("conversation_id", message.conversation_id.to_string()))
            }
            None => return Err(conversation_not_found(&message.conversation_id)),
        }

        let log = tables.messages.entry(message.conversation_id).or_default();
        if let Some(last) = log.last() {
            if message.timestamp < last.timestamp {
                return Err(DomainError::validation(
                    "timestamp",
                    "Message timestamp precedes the previous message",
                ));
            }
        }
        log.push(message.clone());
        Ok(())
    }

    async fn complete(
        &self,
        conversation: &Conversation,
        record: &FeedbackRecord,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let id = *conversation.id();

        if !tables.conversations.contains_key(&id) {
            return Err(conversation_not_found(&id));
        }
        if tables.record_by_conversation.contains_key(&id) {
            return Err(DomainError::new(
                ErrorCode::ConversationEnded,
                "Feedback already exists for this conversation",
            )
            .with_detail("conversation_id", id.to_string()));
        }

        tables.conversations.insert(id, conversation.clone());
        tables.record_by_conversation.insert(id, *record.id());
        tables.records.insert(*record.id(), record.clone());
        tables.feedback_messages.entry(*record.id()).or_default();
        Ok(())
    }
}

#[async_trait]
impl TranscriptSource for InMemoryStore {
    async fn history(&self, conversation_id: &ConversationId) -> Result<Transcript, DomainError> {
        let tables = self.tables.read().await;
        let messages = tables
            .messages
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(Transcript::from_messages(messages))
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn find_by_id(&self, id: &FeedbackRecordId) -> Result<Option<FeedbackRecord>, DomainError> {
        Ok(self.tables.read().await.records.get(id).cloned())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<FeedbackRecord>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .record_by_conversation
            .get(conversation_id)
            .and_then(|id| tables.records.get(id))
            .cloned())
    }

    async fn messages(&self, id: &FeedbackRecordId) -> Result<Vec<FeedbackMessage>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.feedback_messages.get(id).cloned().unwrap_or_default())
    }

    async fn update(&self, record: &FeedbackRecord) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .records
            .get_mut(record.id())
            .ok_or_else(|| feedback_not_found(record.id()))?;
        stored.ensure_accepts_messages()?;
        *stored = record.clone();
        Ok(())
    }

    async fn append_messages(
        &self,
        record: &FeedbackRecord,
        messages: &[FeedbackMessage],
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .records
            .get_mut(record.id())
            .ok_or_else(|| feedback_not_found(record.id()))?;
        stored.ensure_accepts_messages()?;
        // Only the open transition is merged; ending goes through `update`.
        if record.state() == DialogicState::Active {
            stored.open();
        }
        tables
            .feedback_messages
            .entry(*record.id())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ScenarioId) -> Result<Option<Scenario>, DomainError> {
        Ok(self.tables.read().await.scenarios.get(id).cloned())
    }
}

#[async_trait]
impl LearnerDirectory for InMemoryStore {
    async fn first_name(&self, user_id: &UserId) -> Result<Option<String>, DomainError> {
        Ok(self.tables.read().await.first_names.get(user_id).cloned())
    }
}
