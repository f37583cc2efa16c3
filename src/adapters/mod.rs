//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language-model providers (OpenAI, mock)
//! - `memory` - In-memory storage and learner directory

pub mod ai;
pub mod memory;

pub use ai::{MockAIProvider, MockError, OpenAIConfig, OpenAIProvider};
pub use memory::InMemoryStore;
