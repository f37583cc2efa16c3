//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and the state machine trait
//! that form the vocabulary of the practice feedback domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConversationId, FeedbackMessageId, FeedbackRecordId, MessageId, ScenarioId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
