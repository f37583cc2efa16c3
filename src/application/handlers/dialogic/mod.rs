//! Dialogic feedback command and query handlers.
//!
//! A dialogic session lets the learner ask a feedback coach about the feedback
//! generated when their practice conversation ended. Sessions are keyed by the
//! feedback record id.

mod end_session;
mod error;
mod list_messages;
mod send_message;
mod start_session;

pub use end_session::{EndSessionCommand, EndSessionHandler, EndSessionResult};
pub use error::DialogicError;
pub use list_messages::{ListMessagesHandler, ListMessagesQuery, ListMessagesResult};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};

use crate::domain::feedback::FeedbackRecord;
use crate::domain::foundation::{DomainError, ErrorCode, FeedbackRecordId, UserId};
use crate::ports::FeedbackRepository;

/// Tunables for dialogic turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogicSettings {
    /// Most recent dialogic messages sent with each turn.
    pub context_message_limit: usize,
    /// Feedback sections named in the welcome message.
    pub welcome_section_limit: usize,
    pub reply_max_tokens: u32,
    pub reply_temperature: f32,
}

impl Default for DialogicSettings {
    fn default() -> Self {
        Self {
            context_message_limit: 10,
            welcome_section_limit: 3,
            reply_max_tokens: 350,
            reply_temperature: 0.7,
        }
    }
}

/// Loads a feedback record and checks that `user_id` owns it.
async fn load_owned_record(
    repo: &dyn FeedbackRepository,
    id: &FeedbackRecordId,
    user_id: &UserId,
) -> Result<FeedbackRecord, DialogicError> {
    let record = repo.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::FeedbackNotFound, "Feedback session not found")
            .with_detail("feedback_record_id", id.to_string())
    })?;

    if !record.is_owned_by(user_id) {
        tracing::warn!(
            feedback_record_id = %id,
            user_id = %user_id,
            "Rejected access to another user's feedback session"
        );
        return Err(DialogicError::Forbidden);
    }

    Ok(record)
}
