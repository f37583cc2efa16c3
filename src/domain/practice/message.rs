//! Practice conversation messages and the transcript view over them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ConversationId, MessageId, Timestamp, ValidationError};

/// Role of a message sender in a practice conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The learner.
    User,
    /// The AI conversation partner.
    Assistant,
    /// System instructions.
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        };
        write!(f, "{}", s)
    }
}

/// A stored message in a practice conversation. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(
        conversation_id: ConversationId,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::at(conversation_id, role, content, Timestamp::now())
    }

    /// Creates a message with an explicit timestamp.
    pub fn at(
        conversation_id: ConversationId,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            id: MessageId::new(),
            conversation_id,
            role,
            content,
            timestamp,
        })
    }

    /// Projects this message onto its transcript entry.
    pub fn to_entry(&self) -> TranscriptEntry {
        TranscriptEntry::new(self.role, self.content.clone())
    }
}

/// One `{role, content}` line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Ordered message history of a practice conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<TranscriptEntry>);

impl Transcript {
    pub fn new(entries: Vec<TranscriptEntry>) -> Self {
        Self(entries)
    }

    /// Builds a transcript from stored messages, ordering by timestamp.
    ///
    /// The sort is stable, so messages sharing a timestamp keep insertion order.
    pub fn from_messages(messages: &[Message]) -> Self {
        let mut ordered: Vec<&Message> = messages.iter().collect();
        ordered.sort_by_key(|m| m.timestamp);
        Self(ordered.into_iter().map(Message::to_entry).collect())
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattens to `role: content` lines, the form sent to the feedback model.
    pub fn flatten(&self) -> String {
        self.0
            .iter()
            .map(|e| format!("{}: {}", e.role, e.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders with learner-facing speaker labels for dialogic context.
    pub fn render_for_context(&self) -> String {
        if self.0.is_empty() {
            return "No transcript available.".to_string();
        }
        self.0
            .iter()
            .map(|e| {
                let speaker = match e.role {
                    MessageRole::User => "Student",
                    _ => "AI Partner",
                };
                format!("{}: {}", speaker, e.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hola_transcript() -> Transcript {
        Transcript::new(vec![
            TranscriptEntry::user("Hola"),
            TranscriptEntry::assistant("¡Hola! ¿Cómo estás?"),
        ])
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn message_rejects_blank_content() {
        let result = Message::new(ConversationId::new(), MessageRole::User, "  \n");
        assert!(result.is_err());
    }

    #[test]
    fn flatten_uses_role_prefixes() {
        assert_eq!(hola_transcript().flatten(), "user: Hola\nassistant: ¡Hola! ¿Cómo estás?");
    }

    #[test]
    fn render_for_context_labels_speakers() {
        let rendered = hola_transcript().render_for_context();
        assert_eq!(rendered, "Student: Hola\nAI Partner: ¡Hola! ¿Cómo estás?");
    }

    #[test]
    fn empty_transcript_renders_placeholder() {
        assert_eq!(Transcript::default().render_for_context(), "No transcript available.");
    }

    #[test]
    fn from_messages_orders_by_timestamp_and_keeps_ties_stable() {
        let conversation_id = ConversationId::new();
        let t0 = Timestamp::now();
        let late = Message::at(conversation_id, MessageRole::Assistant, "second", t0.plus_secs(5)).unwrap();
        let tie_a = Message::at(conversation_id, MessageRole::User, "first-a", t0).unwrap();
        let tie_b = Message::at(conversation_id, MessageRole::User, "first-b", t0).unwrap();

        let transcript = Transcript::from_messages(&[late, tie_a, tie_b]);
        let contents: Vec<_> = transcript.entries().iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["first-a", "first-b", "second"]);
    }

    #[test]
    fn transcript_serializes_as_plain_array() {
        let json = serde_json::to_value(hola_transcript()).unwrap();
        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[1]["content"], "¡Hola! ¿Cómo estás?");
    }
}
