//! StartSessionHandler - Command handler for opening a dialogic feedback session.
//!
//! Starting is idempotent. The first call opens the session and adds the
//! welcome message; later calls return the stored history unchanged.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::feedback::{
    dialogic, FeedbackMessage, FeedbackVersion, SuggestionEngine,
};
use crate::domain::foundation::{FeedbackRecordId, UserId};
use crate::ports::{FeedbackRepository, LearnerDirectory};

use super::{load_owned_record, DialogicError, DialogicSettings};

/// Command to start (or resume) a dialogic session.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub user_id: UserId,
    pub feedback_record_id: FeedbackRecordId,
}

/// Session history with suggested follow-up questions.
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionResult {
    pub feedback_record_id: FeedbackRecordId,
    pub messages: Vec<FeedbackMessage>,
    pub suggestions: Vec<String>,
    pub is_active: bool,
    pub feedback_version: FeedbackVersion,
}

/// Handler for starting dialogic sessions.
pub struct StartSessionHandler {
    feedback: Arc<dyn FeedbackRepository>,
    learners: Arc<dyn LearnerDirectory>,
    suggestions: SuggestionEngine,
    settings: DialogicSettings,
}

impl StartSessionHandler {
    pub fn new(
        feedback: Arc<dyn FeedbackRepository>,
        learners: Arc<dyn LearnerDirectory>,
        suggestions: SuggestionEngine,
        settings: DialogicSettings,
    ) -> Self {
        Self {
            feedback,
            learners,
            suggestions,
            settings,
        }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<StartSessionResult, DialogicError> {
        let mut record =
            load_owned_record(self.feedback.as_ref(), &cmd.feedback_record_id, &cmd.user_id).await?;
        let mut messages = self.feedback.messages(record.id()).await?;

        if messages.is_empty() && record.is_active() {
            let first_name = match self.learners.first_name(&cmd.user_id).await {
                Ok(name) => name,
                Err(err) => {
                    tracing::warn!(user_id = %cmd.user_id, error = %err, "Learner name lookup failed");
                    None
                }
            };

            let welcome = FeedbackMessage::assistant(
                *record.id(),
                dialogic::welcome_message(
                    first_name.as_deref(),
                    &record,
                    self.settings.welcome_section_limit,
                ),
            )?;
            record.open();
            self.feedback
                .append_messages(&record, std::slice::from_ref(&welcome))
                .await?;
            messages.push(welcome);

            tracing::info!(
                feedback_record_id = %record.id(),
                feedback_version = %record.version(),
                "Dialogic session started"
            );
        }

        Ok(StartSessionResult {
            feedback_record_id: *record.id(),
            suggestions: self.suggestions.suggest(&record),
            is_active: record.is_active(),
            feedback_version: record.version(),
            messages,
        })
    }
}
