//! EndConversationHandler - Command handler for ending a practice conversation.
//!
//! Ends the conversation locally, synthesizes feedback over its transcript and
//! commits the conversation update together with the new feedback record.
//! Nothing is persisted when synthesis fails.

use serde::Serialize;
use std::sync::Arc;

use crate::application::FeedbackSynthesizer;
use crate::domain::feedback::{FeedbackRecord, FeedbackVersion, StructuredFeedback};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, FeedbackRecordId, Timestamp, UserId,
};
use crate::domain::practice::Conversation;
use crate::ports::{
    CompletionPurpose, ConversationRepository, RequestMetadata, ScenarioRepository,
    TranscriptSource,
};

use super::{load_owned_conversation, PracticeError};

/// Command to end a practice conversation.
#[derive(Debug, Clone)]
pub struct EndConversationCommand {
    pub user_id: UserId,
    pub conversation_id: ConversationId,
    /// Defaults to now.
    pub end_time: Option<Timestamp>,
}

/// Result of ending a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct EndConversationResult {
    pub conversation: Conversation,
    /// Readable feedback summary.
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_json: Option<StructuredFeedback>,
    #[serde(rename = "feedback_conversation_id")]
    pub feedback_record_id: FeedbackRecordId,
    pub feedback_version: FeedbackVersion,
    pub dialogic_feedback_available: bool,
}

/// Handler for ending practice conversations.
pub struct EndConversationHandler {
    conversations: Arc<dyn ConversationRepository>,
    transcripts: Arc<dyn TranscriptSource>,
    scenarios: Arc<dyn ScenarioRepository>,
    synthesizer: FeedbackSynthesizer,
}

impl EndConversationHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        transcripts: Arc<dyn TranscriptSource>,
        scenarios: Arc<dyn ScenarioRepository>,
        synthesizer: FeedbackSynthesizer,
    ) -> Self {
        Self {
            conversations,
            transcripts,
            scenarios,
            synthesizer,
        }
    }

    pub async fn handle(
        &self,
        cmd: EndConversationCommand,
    ) -> Result<EndConversationResult, PracticeError> {
        let mut conversation =
            load_owned_conversation(self.conversations.as_ref(), &cmd.conversation_id, &cmd.user_id)
                .await?;

        let scenario = self
            .scenarios
            .find_by_id(conversation.scenario_id())
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ScenarioNotFound, "Scenario not found")
                    .with_detail("scenario_id", conversation.scenario_id().to_string())
            })?;

        // Rejects a second end before any model call.
        let outcome = conversation.end(cmd.end_time.unwrap_or_else(Timestamp::now), &scenario)?;

        let transcript = self.transcripts.history(&cmd.conversation_id).await?;
        let metadata = RequestMetadata::new(
            cmd.user_id.clone(),
            cmd.conversation_id,
            CompletionPurpose::FeedbackSynthesis,
            uuid::Uuid::new_v4().to_string(),
        );
        let synthesized = self
            .synthesizer
            .synthesize(&scenario, &transcript, metadata)
            .await
            .map_err(|err| {
                tracing::error!(
                    conversation_id = %cmd.conversation_id,
                    error = %err,
                    "Feedback synthesis failed"
                );
                err
            })?;

        let feedback_json = synthesized.decoded.structured().cloned();
        let record = FeedbackRecord::new(
            cmd.conversation_id,
            cmd.user_id,
            synthesized.decoded,
            synthesized.model,
        );
        conversation.attach_feedback(record.summary());

        self.conversations.complete(&conversation, &record).await?;

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            feedback_record_id = %record.id(),
            duration_secs = outcome.duration_secs,
            completed = outcome.completed,
            feedback_version = %record.version(),
            "Practice conversation ended"
        );

        Ok(EndConversationResult {
            feedback: record.summary().to_string(),
            feedback_json,
            feedback_record_id: *record.id(),
            feedback_version: record.version(),
            dialogic_feedback_available: true,
            conversation,
        })
    }
}
