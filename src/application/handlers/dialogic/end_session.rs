//! EndSessionHandler - Command handler for closing a dialogic session.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{FeedbackRecordId, Timestamp, UserId};
use crate::ports::FeedbackRepository;

use super::{load_owned_record, DialogicError};

/// Command to end a dialogic session.
#[derive(Debug, Clone)]
pub struct EndSessionCommand {
    pub user_id: UserId,
    pub feedback_record_id: FeedbackRecordId,
}

/// Result of ending a dialogic session.
#[derive(Debug, Clone, Serialize)]
pub struct EndSessionResult {
    pub feedback_record_id: FeedbackRecordId,
    pub end_time: Timestamp,
    /// Seconds between record creation and end.
    pub duration_secs: i64,
}

/// Handler for ending dialogic sessions.
pub struct EndSessionHandler {
    feedback: Arc<dyn FeedbackRepository>,
}

impl EndSessionHandler {
    pub fn new(feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self { feedback }
    }

    pub async fn handle(&self, cmd: EndSessionCommand) -> Result<EndSessionResult, DialogicError> {
        let mut record =
            load_owned_record(self.feedback.as_ref(), &cmd.feedback_record_id, &cmd.user_id).await?;

        let end_time = Timestamp::now();
        let duration_secs = record.end(end_time)?;
        self.feedback.update(&record).await?;

        tracing::info!(
            feedback_record_id = %record.id(),
            duration_secs,
            "Dialogic session ended"
        );

        Ok(EndSessionResult {
            feedback_record_id: *record.id(),
            end_time,
            duration_secs,
        })
    }
}
