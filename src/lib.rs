//! Practice Feedback - feedback for language-practice conversations.
//!
//! Ends a practice conversation, asks a language model for structured
//! feedback over its transcript, recovers that feedback from imperfect model
//! output, and runs a coaching dialogue about the result.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
