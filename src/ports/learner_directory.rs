//! Learner directory port.
//!
//! Read-only view of learner profile data owned by the user service.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait LearnerDirectory: Send + Sync {
    /// The learner's first name, if known.
    async fn first_name(&self, user_id: &UserId) -> Result<Option<String>, DomainError>;
}
