//! Structured feedback schema.
//!
//! This is the exact object the feedback model is asked to return. Every field
//! is required: a response missing one is not structured feedback.

use serde::{Deserialize, Serialize};

/// Top-level strengths and areas for improvement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

/// Feedback for one evaluated area (e.g. "Grammar & Syntax").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSection {
    pub area: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub tips: Vec<String>,
}

/// Per-area feedback sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedFeedback {
    pub sections: Vec<FeedbackSection>,
}

/// Complete structured feedback for a practice conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFeedback {
    pub summary: FeedbackSummary,
    pub detailed_feedback: DetailedFeedback,
    pub encouragement: String,
}

impl StructuredFeedback {
    pub fn sections(&self) -> &[FeedbackSection] {
        &self.detailed_feedback.sections
    }

    /// Area names of the first `limit` sections, in order.
    pub fn section_areas(&self, limit: usize) -> Vec<&str> {
        self.sections()
            .iter()
            .take(limit)
            .map(|s| s.area.trim())
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Renders the learner-facing summary text.
    ///
    /// Strengths, then areas for improvement, then the encouragement line.
    /// Empty parts are skipped.
    pub fn summary_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.summary.strengths.is_empty() {
            parts.push("Strengths:".to_string());
            parts.extend(self.summary.strengths.iter().map(|s| format!("• {}", s)));
            parts.push(String::new());
        }

        if !self.summary.areas_for_improvement.is_empty() {
            parts.push("Areas for Improvement:".to_string());
            parts.extend(
                self.summary
                    .areas_for_improvement
                    .iter()
                    .map(|a| format!("• {}", a)),
            );
            parts.push(String::new());
        }

        if !self.encouragement.trim().is_empty() {
            parts.push(self.encouragement.clone());
        }

        parts.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructuredFeedback {
        StructuredFeedback {
            summary: FeedbackSummary {
                strengths: vec!["Good greeting".to_string()],
                areas_for_improvement: vec!["Verb conjugation".to_string()],
            },
            detailed_feedback: DetailedFeedback { sections: vec![] },
            encouragement: "Keep going!".to_string(),
        }
    }

    #[test]
    fn summary_text_keeps_relative_order() {
        let text = sample().summary_text();
        let strengths = text.find("Good greeting").unwrap();
        let areas = text.find("Verb conjugation").unwrap();
        let encouragement = text.find("Keep going!").unwrap();
        assert!(strengths < areas && areas < encouragement);
    }

    #[test]
    fn summary_text_layout() {
        assert_eq!(
            sample().summary_text(),
            "Strengths:\n• Good greeting\n\nAreas for Improvement:\n• Verb conjugation\n\nKeep going!"
        );
    }

    #[test]
    fn summary_text_skips_empty_lists() {
        let mut feedback = sample();
        feedback.summary.strengths.clear();
        let text = feedback.summary_text();
        assert!(!text.contains("Strengths:"));
        assert!(text.starts_with("Areas for Improvement:"));
    }

    #[test]
    fn missing_field_is_rejected() {
        let json = r#"{"summary":{"strengths":[],"areas_for_improvement":[]},"encouragement":"x"}"#;
        assert!(serde_json::from_str::<StructuredFeedback>(json).is_err());
    }

    #[test]
    fn section_areas_respects_limit_and_skips_blank() {
        let section = |area: &str| FeedbackSection {
            area: area.to_string(),
            strengths: vec![],
            areas_for_improvement: vec![],
            tips: vec![],
        };
        let mut feedback = sample();
        feedback.detailed_feedback.sections =
            vec![section("Grammar"), section(" "), section("Vocabulary"), section("Fluency")];

        assert_eq!(feedback.section_areas(3), vec!["Grammar", "Vocabulary"]);
    }
}
