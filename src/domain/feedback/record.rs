//! Feedback record and dialogic feedback messages.
//!
//! One `FeedbackRecord` is created when a practice conversation ends. It owns
//! the decoded feedback and the lifecycle of the dialogic session that lets
//! the learner ask follow-up questions about it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, FeedbackMessageId, FeedbackRecordId, StateMachine,
    Timestamp, UserId, ValidationError,
};

use super::{DecodedFeedback, StructuredFeedback};

/// How the stored feedback was recovered from the model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackVersion {
    /// The response parsed directly as structured feedback.
    Structured,
    /// Structured feedback was extracted from surrounding text.
    StructuredExtracted,
    /// No structure could be recovered; feedback is plain text.
    FallbackText,
}

impl fmt::Display for FeedbackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedbackVersion::Structured => "structured",
            FeedbackVersion::StructuredExtracted => "structured_extracted",
            FeedbackVersion::FallbackText => "fallback_text",
        };
        write!(f, "{}", s)
    }
}

/// Stored feedback content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum FeedbackPayload {
    Structured(StructuredFeedback),
    Text(String),
}

impl From<DecodedFeedback> for FeedbackPayload {
    fn from(decoded: DecodedFeedback) -> Self {
        match decoded {
            DecodedFeedback::Structured(f) | DecodedFeedback::Extracted(f) => {
                FeedbackPayload::Structured(f)
            }
            DecodedFeedback::PlainText(text) => FeedbackPayload::Text(text),
        }
    }
}

/// Lifecycle of the dialogic feedback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogicState {
    /// Feedback exists but the learner has not opened the session.
    #[default]
    Uninitialized,
    /// The session has been opened and accepts messages.
    Active,
    /// The session is closed. Terminal.
    Ended,
}

impl StateMachine for DialogicState {
    fn valid_transitions(&self) -> Vec<Self> {
        use DialogicState::*;
        match self {
            Uninitialized => vec![Active, Ended],
            Active => vec![Ended],
            Ended => vec![],
        }
    }
}

/// Feedback produced for one ended practice conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    id: FeedbackRecordId,
    conversation_id: ConversationId,
    user_id: UserId,
    summary: String,
    payload: FeedbackPayload,
    model: String,
    version: FeedbackVersion,
    state: DialogicState,
    start_time: Timestamp,
    end_time: Option<Timestamp>,
}

impl FeedbackRecord {
    /// Creates the record for freshly decoded feedback.
    pub fn new(
        conversation_id: ConversationId,
        user_id: UserId,
        decoded: DecodedFeedback,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: FeedbackRecordId::new(),
            conversation_id,
            user_id,
            summary: decoded.summary_text(),
            version: decoded.version(),
            payload: decoded.into(),
            model: model.into(),
            state: DialogicState::Uninitialized,
            start_time: Timestamp::now(),
            end_time: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &FeedbackRecordId {
        &self.id
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Learner-facing plain-text summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn payload(&self) -> &FeedbackPayload {
        &self.payload
    }

    /// The structured feedback, if it was recovered.
    pub fn structured(&self) -> Option<&StructuredFeedback> {
        match &self.payload {
            FeedbackPayload::Structured(f) => Some(f),
            FeedbackPayload::Text(_) => None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn version(&self) -> FeedbackVersion {
        self.version
    }

    pub fn state(&self) -> DialogicState {
        self.state
    }

    /// True until the dialogic session is ended.
    pub fn is_active(&self) -> bool {
        self.state != DialogicState::Ended
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn end_time(&self) -> Option<&Timestamp> {
        self.end_time.as_ref()
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialogic lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens the dialogic session. Returns true if the state changed.
    ///
    /// Opening an already active or ended session is a no-op.
    pub fn open(&mut self) -> bool {
        if self.state == DialogicState::Uninitialized {
            self.state = DialogicState::Active;
            true
        } else {
            false
        }
    }

    /// Fails with `SessionEnded` once the session is closed.
    pub fn ensure_accepts_messages(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(self.ended_error())
        }
    }

    /// Ends the session at `at`, returning the session length in seconds.
    ///
    /// # Errors
    ///
    /// `SessionEnded` if the session was already ended.
    pub fn end(&mut self, at: Timestamp) -> Result<i64, DomainError> {
        let next = self
            .state
            .transition_to(DialogicState::Ended)
            .map_err(|_| self.ended_error())?;

        self.state = next;
        self.end_time = Some(at);
        Ok(at.secs_since(&self.start_time).max(0))
    }

    fn ended_error(&self) -> DomainError {
        DomainError::new(ErrorCode::SessionEnded, "Feedback session has ended")
            .with_detail("feedback_record_id", self.id.to_string())
    }
}

/// Sender of a dialogic feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRole {
    User,
    FeedbackAssistant,
}

/// A message in a dialogic feedback session. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub id: FeedbackMessageId,
    pub feedback_record_id: FeedbackRecordId,
    pub role: FeedbackRole,
    pub content: String,
    pub timestamp: Timestamp,
    /// True when the learner sent one of the offered suggestions.
    pub is_suggestion: bool,
}

impl FeedbackMessage {
    /// A learner question.
    pub fn user(
        feedback_record_id: FeedbackRecordId,
        content: impl Into<String>,
        is_suggestion: bool,
    ) -> Result<Self, ValidationError> {
        Self::create(feedback_record_id, FeedbackRole::User, content, is_suggestion)
    }

    /// A feedback assistant reply.
    pub fn assistant(
        feedback_record_id: FeedbackRecordId,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::create(feedback_record_id, FeedbackRole::FeedbackAssistant, content, false)
    }

    fn create(
        feedback_record_id: FeedbackRecordId,
        role: FeedbackRole,
        content: impl Into<String>,
        is_suggestion: bool,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            id: FeedbackMessageId::new(),
            feedback_record_id,
            role,
            content,
            timestamp: Timestamp::now(),
            is_suggestion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(decoded: DecodedFeedback) -> FeedbackRecord {
        FeedbackRecord::new(
            ConversationId::new(),
            UserId::new("learner").unwrap(),
            decoded,
            "gpt-4o",
        )
    }

    fn text_record() -> FeedbackRecord {
        record(DecodedFeedback::PlainText("Work on verb tenses.".into()))
    }

    mod version {
        use super::*;

        #[test]
        fn serializes_snake_case() {
            let json = serde_json::to_string(&FeedbackVersion::StructuredExtracted).unwrap();
            assert_eq!(json, "\"structured_extracted\"");
            assert_eq!(FeedbackVersion::FallbackText.to_string(), "fallback_text");
        }

        #[test]
        fn follows_decode_outcome() {
            assert_eq!(text_record().version(), FeedbackVersion::FallbackText);
            assert!(text_record().structured().is_none());
            assert_eq!(text_record().summary(), "Work on verb tenses.");
        }
    }

    mod dialogic_state {
        use super::*;

        #[test]
        fn uninitialized_can_open_or_end() {
            assert!(DialogicState::Uninitialized.can_transition_to(&DialogicState::Active));
            assert!(DialogicState::Uninitialized.can_transition_to(&DialogicState::Ended));
        }

        #[test]
        fn ended_is_terminal() {
            assert!(DialogicState::Ended.is_terminal());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn new_record_is_active_and_uninitialized() {
            let record = text_record();
            assert!(record.is_active());
            assert_eq!(record.state(), DialogicState::Uninitialized);
        }

        #[test]
        fn open_is_idempotent() {
            let mut record = text_record();
            assert!(record.open());
            assert!(!record.open());
            assert_eq!(record.state(), DialogicState::Active);
        }

        #[test]
        fn end_records_time_and_returns_duration() {
            let mut record = text_record();
            record.open();
            let at = record.start_time().plus_secs(42);

            let secs = record.end(at).unwrap();

            assert_eq!(secs, 42);
            assert!(!record.is_active());
            assert_eq!(record.end_time(), Some(&at));
        }

        #[test]
        fn ended_session_rejects_messages_and_second_end() {
            let mut record = text_record();
            record.end(Timestamp::now()).unwrap();

            assert_eq!(record.ensure_accepts_messages().unwrap_err().code, ErrorCode::SessionEnded);
            assert_eq!(record.end(Timestamp::now()).unwrap_err().code, ErrorCode::SessionEnded);
            assert!(!record.open());
        }
    }

    mod messages {
        use super::*;

        #[test]
        fn blank_content_is_rejected() {
            assert!(FeedbackMessage::user(FeedbackRecordId::new(), "   ", false).is_err());
        }

        #[test]
        fn role_serializes_snake_case() {
            let json = serde_json::to_string(&FeedbackRole::FeedbackAssistant).unwrap();
            assert_eq!(json, "\"feedback_assistant\"");
        }

        #[test]
        fn payload_is_tagged() {
            let json = serde_json::to_value(FeedbackPayload::Text("hi".into())).unwrap();
            assert_eq!(json["kind"], "text");
            assert_eq!(json["content"], "hi");
        }
    }
}
