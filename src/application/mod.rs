//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) and query handlers (read) are kept apart.

mod feedback_synthesizer;
pub mod handlers;

pub use feedback_synthesizer::{
    FeedbackSynthesizer, SynthesisError, SynthesizedFeedback, DEFAULT_SYNTHESIS_TIMEOUT,
};
pub use handlers::*;
