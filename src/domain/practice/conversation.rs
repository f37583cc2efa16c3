//! Practice conversation aggregate.
//!
//! A conversation is created when a learner starts a scenario and is ended
//! exactly once. Ending fixes the duration, decides completion against the
//! scenario's minimum time, and attaches the plain-text feedback summary.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, ScenarioId, StateMachine, Timestamp, UserId,
};

use super::Scenario;

/// Lifecycle status of a practice conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Learner is practicing; messages may be appended.
    #[default]
    Active,
    /// Practice is over. Terminal.
    Ended,
}

impl StateMachine for ConversationStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ConversationStatus::Active => vec![ConversationStatus::Ended],
            ConversationStatus::Ended => vec![],
        }
    }
}

/// Practice conversation aggregate.
///
/// # Invariants
///
/// - Once ended, `completed == (duration_secs >= scenario.min_time_secs)`
/// - `end_time`, `duration_secs` are set together, exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    user_id: UserId,
    scenario_id: ScenarioId,
    status: ConversationStatus,
    start_time: Timestamp,
    end_time: Option<Timestamp>,
    duration_secs: Option<i64>,
    completed: bool,
    feedback: Option<String>,
}

/// What the end transition decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOutcome {
    pub end_time: Timestamp,
    pub duration_secs: i64,
    pub completed: bool,
}

impl Conversation {
    /// Starts a new active conversation now.
    pub fn start(user_id: UserId, scenario_id: ScenarioId) -> Self {
        Self::start_at(user_id, scenario_id, Timestamp::now())
    }

    /// Starts a new active conversation at the given time.
    pub fn start_at(user_id: UserId, scenario_id: ScenarioId, start_time: Timestamp) -> Self {
        Self {
            id: ConversationId::new(),
            user_id,
            scenario_id,
            status: ConversationStatus::Active,
            start_time,
            end_time: None,
            duration_secs: None,
            completed: false,
            feedback: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario_id
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn end_time(&self) -> Option<&Timestamp> {
        self.end_time.as_ref()
    }

    pub fn duration_secs(&self) -> Option<i64> {
        self.duration_secs
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Plain-text feedback summary, once feedback has been generated.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.status == ConversationStatus::Active
    }

    /// Returns true if `user_id` owns this conversation.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Ends the conversation at `end_time`.
    ///
    /// # Errors
    ///
    /// - `ConversationEnded` if the conversation was already ended
    /// - `ValidationFailed` if `end_time` precedes the start time
    pub fn end(&mut self, end_time: Timestamp, scenario: &Scenario) -> Result<EndOutcome, DomainError> {
        let next = self.status.transition_to(ConversationStatus::Ended).map_err(|_| {
            DomainError::new(ErrorCode::ConversationEnded, "Conversation has already ended")
                .with_detail("conversation_id", self.id.to_string())
        })?;

        let duration_secs = end_time.secs_since(&self.start_time);
        if duration_secs < 0 {
            return Err(DomainError::validation(
                "end_time",
                "End time cannot precede the start time",
            ));
        }

        let completed = scenario.is_completed_by(duration_secs);
        self.status = next;
        self.end_time = Some(end_time);
        self.duration_secs = Some(duration_secs);
        self.completed = completed;

        Ok(EndOutcome {
            end_time,
            duration_secs,
            completed,
        })
    }

    /// Stores the plain-text feedback summary.
    pub fn attach_feedback(&mut self, summary: impl Into<String>) {
        self.feedback = Some(summary.into());
    }
}
