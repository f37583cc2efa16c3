//! Practice domain module.
//!
//! The learner's primary dialogue with the AI conversation partner:
//! scenario settings, the conversation lifecycle, and its transcript.

mod conversation;
mod message;
mod scenario;

pub use conversation::{Conversation, ConversationStatus, EndOutcome};
pub use message::{Message, MessageRole, Transcript, TranscriptEntry};
pub use scenario::Scenario;
