//! Follow-up question suggestions for the dialogic feedback session.
//!
//! Suggestions are a pure function of the stored feedback, so they stay the
//! same across turns of a session.

use super::{FeedbackPayload, FeedbackRecord, StructuredFeedback};

/// Generic prompts offered for every feedback record.
pub const BASE_SUGGESTIONS: [&str; 5] = [
    "What did I do well in this conversation?",
    "How can I improve for next time?",
    "Can you give me specific examples?",
    "Can we practice one better sentence together?",
    "Which mistake should I fix first?",
];

/// Area keyword to specialized prompt. The first matching keyword wins.
const AREA_PROMPTS: [(&str, &str); 5] = [
    ("grammar", "What grammar mistakes should I focus on?"),
    ("vocabulary", "How can I expand my vocabulary?"),
    ("conversation", "How can I improve my conversation flow?"),
    ("pronunciation", "What pronunciation tips do you have?"),
    ("cultural", "How can I be more culturally appropriate?"),
];

/// Keyword groups scanned in plain-text feedback. Each matched group adds
/// its prompt once.
const TEXT_PROMPTS: [(&[&str], &str); 5] = [
    (&["grammar", "grammatical", "tense"], "Can you explain the grammar issues you mentioned?"),
    (&["vocabulary", "word choice", "expression"], "How can I expand my vocabulary?"),
    (&["fluency", "pace", "hesitation"], "What can I do to speak more fluently?"),
    (&["confidence", "nervous", "hesitant"], "How can I build more confidence when speaking?"),
    (&["pronunciation", "accent", "clear"], "How can I improve my pronunciation?"),
];

/// Limits applied when building suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionConfig {
    /// How many feedback sections contribute area-specific prompts.
    pub section_limit: usize,
    /// Maximum number of suggestions returned.
    pub max_suggestions: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            section_limit: 3,
            max_suggestions: 6,
        }
    }
}

/// Derives follow-up questions from feedback content.
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    config: SuggestionConfig,
}

impl SuggestionEngine {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    /// Suggestions for a feedback record: base prompts first, then
    /// contextual ones, de-duplicated and capped.
    pub fn suggest(&self, record: &FeedbackRecord) -> Vec<String> {
        let contextual = match record.payload() {
            FeedbackPayload::Structured(feedback) => self.structured_prompts(feedback),
            FeedbackPayload::Text(text) => {
                let text = if text.trim().is_empty() { record.summary() } else { text.as_str() };
                text_prompts(text)
            }
        };

        let mut suggestions: Vec<String> = Vec::with_capacity(self.config.max_suggestions);
        for candidate in BASE_SUGGESTIONS.iter().map(|s| s.to_string()).chain(contextual) {
            if suggestions.len() == self.config.max_suggestions {
                break;
            }
            if !suggestions.contains(&candidate) {
                suggestions.push(candidate);
            }
        }
        suggestions
    }

    // Specialized prompts come before "tell me more" prompts so that the few
    // slots left after the base list go to the most specific questions.
    fn structured_prompts(&self, feedback: &StructuredFeedback) -> Vec<String> {
        let areas = feedback.section_areas(self.config.section_limit);

        let specialized = areas.iter().filter_map(|area| {
            let area = area.to_lowercase();
            AREA_PROMPTS
                .iter()
                .find(|(keyword, _)| area.contains(keyword))
                .map(|(_, prompt)| prompt.to_string())
        });
        let tell_me_more = areas
            .iter()
            .map(|area| format!("Tell me more about my {}", area.to_lowercase()));

        specialized.chain(tell_me_more).collect()
    }
}

fn text_prompts(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    TEXT_PROMPTS
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, prompt)| prompt.to_string())
        .collect()
}
