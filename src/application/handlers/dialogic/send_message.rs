//! SendMessageHandler - Command handler for one dialogic coaching turn.
//!
//! The model sees the coach style contract, the stored feedback, the original
//! practice transcript and a bounded window of recent dialogic messages. The
//! learner message and the reply are committed together once the model
//! succeeds, so a failed turn leaves the history untouched.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::feedback::{dialogic, FeedbackMessage, SuggestionEngine};
use crate::domain::foundation::{FeedbackRecordId, UserId};
use crate::ports::{
    AIProvider, CompletionPurpose, CompletionRequest, FeedbackRepository, RequestMetadata,
    TranscriptSource,
};

use super::{load_owned_record, DialogicError, DialogicSettings};

/// Command to send a learner message in a dialogic session.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub user_id: UserId,
    pub feedback_record_id: FeedbackRecordId,
    pub content: String,
    /// True when the learner picked one of the offered suggestions.
    pub is_suggestion: bool,
}

/// Result of a dialogic turn.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResult {
    pub user_message: FeedbackMessage,
    pub reply: FeedbackMessage,
    pub suggestions: Vec<String>,
}

/// Handler for dialogic turns.
pub struct SendMessageHandler {
    feedback: Arc<dyn FeedbackRepository>,
    transcripts: Arc<dyn TranscriptSource>,
    ai_provider: Arc<dyn AIProvider>,
    suggestions: SuggestionEngine,
    settings: DialogicSettings,
}

impl SendMessageHandler {
    pub fn new(
        feedback: Arc<dyn FeedbackRepository>,
        transcripts: Arc<dyn TranscriptSource>,
        ai_provider: Arc<dyn AIProvider>,
        suggestions: SuggestionEngine,
        settings: DialogicSettings,
    ) -> Self {
        Self {
            feedback,
            transcripts,
            ai_provider,
            suggestions,
            settings,
        }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, DialogicError> {
        let mut record =
            load_owned_record(self.feedback.as_ref(), &cmd.feedback_record_id, &cmd.user_id).await?;
        record.ensure_accepts_messages()?;
        if cmd.content.trim().is_empty() {
            return Err(DialogicError::EmptyMessage);
        }
        record.open();

        let history = self.feedback.messages(record.id()).await?;
        let transcript = self.transcripts.history(record.conversation_id()).await?;
        let window =
            dialogic::context_window(&history, &cmd.content, self.settings.context_message_limit);

        let metadata = RequestMetadata::new(
            cmd.user_id.clone(),
            *record.conversation_id(),
            CompletionPurpose::DialogicReply,
            uuid::Uuid::new_v4().to_string(),
        );
        let request = CompletionRequest::new(metadata)
            .with_system_prompt(dialogic::coach_system_prompt(&record, &transcript))
            .with_entries(&window)
            .with_max_tokens(self.settings.reply_max_tokens)
            .with_temperature(self.settings.reply_temperature);

        tracing::debug!(
            feedback_record_id = %record.id(),
            context_messages = window.len(),
            is_suggestion = cmd.is_suggestion,
            "Requesting dialogic reply"
        );

        let response = self.ai_provider.complete(request).await.map_err(|err| {
            tracing::error!(feedback_record_id = %record.id(), error = %err, "Dialogic reply failed");
            DialogicError::from(err)
        })?;

        let reply_text = response.content.trim();
        if reply_text.is_empty() {
            return Err(DialogicError::Upstream("Model returned an empty reply".to_string()));
        }

        let user_message = FeedbackMessage::user(*record.id(), cmd.content, cmd.is_suggestion)?;
        let reply = FeedbackMessage::assistant(*record.id(), reply_text)?;
        self.feedback
            .append_messages(&record, &[user_message.clone(), reply.clone()])
            .await?;

        tracing::info!(
            feedback_record_id = %record.id(),
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Dialogic reply added"
        );

        Ok(SendMessageResult {
            suggestions: self.suggestions.suggest(&record),
            user_message,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::dialogic::fixtures::{ended_conversation, learner, structured};
    use crate::application::handlers::dialogic::{EndSessionCommand, EndSessionHandler};
    use crate::domain::feedback::{FeedbackRecord, FeedbackRole, SuggestionConfig};
    use crate::domain::foundation::Timestamp;
    use crate::domain::practice::MessageRole;
    use std::time::Duration;

    const REPLY: &str = "Great question! Try using the past tense. How did that feel?";

    fn handler(store: &InMemoryStore, provider: Arc<MockAIProvider>) -> SendMessageHandler {
        handler_with(store, provider, DialogicSettings::default())
    }

    fn handler_with(
        store: &InMemoryStore,
        provider: Arc<MockAIProvider>,
        settings: DialogicSettings,
    ) -> SendMessageHandler {
        SendMessageHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            provider,
            SuggestionEngine::new(SuggestionConfig::default()),
            settings,
        )
    }

    fn cmd(record: &FeedbackRecord, content: &str) -> SendMessageCommand {
        SendMessageCommand {
            user_id: learner(),
            feedback_record_id: *record.id(),
            content: content.to_string(),
            is_suggestion: false,
        }
    }

    mod turn {
        use super::*;

        #[tokio::test]
        async fn appends_user_message_and_reply() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&["Grammar & Syntax"])).await;
            let provider = Arc::new(MockAIProvider::new().with_response(REPLY));

            let mut command = cmd(&record, "How do I fix my verbs?");
            command.is_suggestion = true;
            let result = handler(&store, provider).handle(command).await.unwrap();

            assert_eq!(result.user_message.role, FeedbackRole::User);
            assert!(result.user_message.is_suggestion);
            assert_eq!(result.reply.role, FeedbackRole::FeedbackAssistant);
            assert_eq!(result.reply.content, REPLY);
            assert_eq!(
                store.messages(record.id()).await.unwrap(),
                vec![result.user_message, result.reply]
            );
        }

        #[tokio::test]
        async fn request_carries_feedback_transcript_and_settings() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&["Grammar & Syntax"])).await;
            let provider = Arc::new(MockAIProvider::new().with_response(REPLY));

            handler(&store, provider.clone())
                .handle(cmd(&record, "What went well?"))
                .await
                .unwrap();

            let call = provider.last_call().unwrap();
            let system = call.system_prompt.unwrap();
            assert!(system.contains("STRUCTURED FEEDBACK:"));
            assert!(system.contains("Grammar & Syntax"));
            assert!(system.contains("¡Hola! ¿Cómo estás?"));
            assert_eq!(call.max_tokens, Some(350));
            assert_eq!(call.temperature, Some(0.7));
            let last = call.messages.last().unwrap();
            assert_eq!(last.role, MessageRole::User);
            assert_eq!(last.content, "What went well?");
        }

        #[tokio::test]
        async fn context_window_is_bounded() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&[])).await;
            let provider = Arc::new(MockAIProvider::new().with_response(REPLY));
            let settings = DialogicSettings {
                context_message_limit: 3,
                ..DialogicSettings::default()
            };
            let handler = handler_with(&store, provider.clone(), settings);

            for question in ["one", "two", "three"] {
                handler.handle(cmd(&record, question)).await.unwrap();
            }

            let call = provider.last_call().unwrap();
            assert_eq!(call.messages.len(), 3);
            assert_eq!(call.messages[2].content, "three");
        }

        #[tokio::test]
        async fn suggestions_come_from_original_feedback() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&["Grammar & Syntax"])).await;
            let provider = Arc::new(MockAIProvider::new().with_response("Pronunciation is key."));

            let result = handler(&store, provider)
                .handle(cmd(&record, "Anything else?"))
                .await
                .unwrap();

            let engine = SuggestionEngine::new(SuggestionConfig::default());
            assert_eq!(result.suggestions, engine.suggest(&record));
        }
    }

    mod rejection {
        use super::*;

        #[tokio::test]
        async fn ended_session_appends_nothing() {
            let store = InMemoryStore::new();
            let mut record = ended_conversation(&store, structured(&[])).await;
            record.end(Timestamp::now()).unwrap();
            store.update(&record).await.unwrap();
            let provider = Arc::new(MockAIProvider::new().with_response(REPLY));

            let result = handler(&store, provider.clone()).handle(cmd(&record, "Hello?")).await;

            assert!(matches!(result, Err(DialogicError::SessionEnded)));
            assert_eq!(provider.call_count(), 0);
            assert!(store.messages(record.id()).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn session_ended_during_reply_stays_ended() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&[])).await;
            let provider = Arc::new(
                MockAIProvider::new()
                    .with_response(REPLY)
                    .with_delay(Duration::from_millis(200)),
            );
            let chat = handler(&store, provider.clone());
            let end = EndSessionHandler::new(Arc::new(store.clone()));

            let (chatted, ended) = tokio::join!(chat.handle(cmd(&record, "Still there?")), async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                end.handle(EndSessionCommand {
                    user_id: learner(),
                    feedback_record_id: *record.id(),
                })
                .await
            });

            let ended = ended.unwrap();
            assert!(matches!(chatted, Err(DialogicError::SessionEnded)));
            assert_eq!(provider.call_count(), 1);
            let stored = store.find_by_id(record.id()).await.unwrap().unwrap();
            assert!(!stored.is_active());
            assert_eq!(stored.end_time(), Some(&ended.end_time));
            assert!(store.messages(record.id()).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn blank_message_is_rejected() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&[])).await;
            let provider = Arc::new(MockAIProvider::new().with_response(REPLY));

            let result = handler(&store, provider.clone()).handle(cmd(&record, "   ")).await;

            assert!(matches!(result, Err(DialogicError::EmptyMessage)));
            assert_eq!(provider.call_count(), 0);
        }

        #[tokio::test]
        async fn model_failure_persists_nothing() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&[])).await;
            let provider = Arc::new(MockAIProvider::new().with_error(MockError::Network {
                message: "reset".into(),
            }));

            let result = handler(&store, provider).handle(cmd(&record, "Hello?")).await;

            assert!(matches!(result, Err(DialogicError::Upstream(_))));
            assert!(store.messages(record.id()).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn blank_reply_is_upstream_error() {
            let store = InMemoryStore::new();
            let record = ended_conversation(&store, structured(&[])).await;
            let provider = Arc::new(MockAIProvider::new().with_response("  \n"));

            let result = handler(&store, provider).handle(cmd(&record, "Hello?")).await;

            assert!(matches!(result, Err(DialogicError::Upstream(_))));
            assert!(store.messages(record.id()).await.unwrap().is_empty());
        }
    }
}
