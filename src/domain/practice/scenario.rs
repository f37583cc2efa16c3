//! Scenario configuration consumed by the feedback pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ScenarioId, ValidationError};

/// The instructor-authored parts of a practice scenario that feedback needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    /// Instructor feedback instructions, used as the base of the feedback prompt.
    pub feedback_instructions: Option<String>,
    /// Free-text proficiency level, e.g. "Beginner (A1)".
    pub proficiency_level: String,
    /// Minimum practice duration, in seconds, for a conversation to count as completed.
    pub min_time_secs: i64,
    /// Target language code, e.g. "es".
    pub language_code: String,
}

impl Scenario {
    /// Creates a scenario with the given feedback instructions.
    pub fn new(
        feedback_instructions: impl Into<String>,
        proficiency_level: impl Into<String>,
        min_time_secs: i64,
    ) -> Result<Self, ValidationError> {
        if min_time_secs < 0 {
            return Err(ValidationError::out_of_range(
                "min_time_secs",
                0,
                i64::MAX,
                min_time_secs,
            ));
        }
        Ok(Self {
            id: ScenarioId::new(),
            feedback_instructions: Some(feedback_instructions.into()),
            proficiency_level: proficiency_level.into(),
            min_time_secs,
            language_code: "en".to_string(),
        })
    }

    /// Sets the target language code.
    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }

    /// Returns the feedback instructions if present and non-blank.
    pub fn feedback_instructions(&self) -> Option<&str> {
        self.feedback_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true if `duration_secs` meets the minimum practice time.
    pub fn is_completed_by(&self, duration_secs: i64) -> bool {
        duration_secs >= self.min_time_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_min_time() {
        assert!(Scenario::new("Evaluate grammar", "Beginner", -1).is_err());
    }

    #[test]
    fn blank_instructions_are_treated_as_missing() {
        let mut scenario = Scenario::new("   ", "Beginner", 60).unwrap();
        assert_eq!(scenario.feedback_instructions(), None);

        scenario.feedback_instructions = None;
        assert_eq!(scenario.feedback_instructions(), None);
    }

    #[test]
    fn instructions_are_trimmed() {
        let scenario = Scenario::new("  Areas to evaluate: Grammar\n", "Beginner", 60).unwrap();
        assert_eq!(scenario.feedback_instructions(), Some("Areas to evaluate: Grammar"));
    }

    #[test]
    fn completion_boundary_is_inclusive() {
        let scenario = Scenario::new("x", "Beginner", 60).unwrap();
        assert!(!scenario.is_completed_by(59));
        assert!(scenario.is_completed_by(60));
        assert!(scenario.is_completed_by(61));
    }
}
