//! Scenario repository port.
//!
//! Scenarios are authored elsewhere; the feedback core only reads them.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ScenarioId};
use crate::domain::practice::Scenario;

#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Find a scenario by its ID.
    async fn find_by_id(&self, id: &ScenarioId) -> Result<Option<Scenario>, DomainError>;
}
