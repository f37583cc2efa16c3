//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `practice` - Practice conversations, scenarios and transcripts
//! - `feedback` - Feedback decoding, records and the dialogic session

pub mod feedback;
pub mod foundation;
pub mod practice;
