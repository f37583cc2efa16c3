//! Feedback domain module.
//!
//! Everything produced after a practice conversation ends: the structured
//! feedback schema and its resilient decoding, the feedback record, and the
//! dialogic session in which the learner asks about that feedback.
//!
//! # Module Structure
//!
//! - `structured` - The JSON schema the feedback model must return
//! - `recovery` - Repair strategies and the decode pipeline
//! - `prompt` - Feedback synthesis system prompt
//! - `record` - Feedback record, dialogic state and messages
//! - `suggestions` - Follow-up question heuristics
//! - `dialogic` - Welcome message, coach prompt and context window

pub mod dialogic;
mod prompt;
pub mod recovery;
mod record;
mod structured;
mod suggestions;

pub use prompt::build_feedback_prompt;
pub use recovery::{recover, DecodedFeedback, MalformedResponse};
pub use record::{
    DialogicState, FeedbackMessage, FeedbackPayload, FeedbackRecord, FeedbackRole,
    FeedbackVersion,
};
pub use structured::{DetailedFeedback, FeedbackSection, FeedbackSummary, StructuredFeedback};
pub use suggestions::{SuggestionConfig, SuggestionEngine, BASE_SUGGESTIONS};
