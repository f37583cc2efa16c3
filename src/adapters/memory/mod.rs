//! In-memory adapters.
//!
//! Used by tests and the CLI. Not durable across restarts.

mod in_memory_store;

pub use in_memory_store::InMemoryStore;
