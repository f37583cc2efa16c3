//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Model Port
//!
//! - `AIProvider` - Language-model completions
//!
//! ## Storage Ports
//!
//! - `ConversationRepository` - Practice conversations and the end-of-session commit
//! - `TranscriptSource` - Ordered message history of a conversation
//! - `FeedbackRepository` - Feedback records and dialogic messages
//! - `ScenarioRepository` - Read-only scenario settings
//!
//! ## Directory Ports
//!
//! - `LearnerDirectory` - Learner names for personalization

mod ai_provider;
mod conversation_repository;
mod feedback_repository;
mod learner_directory;
mod scenario_repository;
mod transcript_source;

pub use ai_provider::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, CompletionResponse, FinishReason,
    Message, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_repository::ConversationRepository;
pub use feedback_repository::FeedbackRepository;
pub use learner_directory::LearnerDirectory;
pub use scenario_repository::ScenarioRepository;
pub use transcript_source::TranscriptSource;
