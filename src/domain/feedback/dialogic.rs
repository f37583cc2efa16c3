//! Dialogic feedback: the coaching exchange that follows generated feedback.
//!
//! This module holds the pure parts of a dialogic turn. The welcome message
//! that opens a session, the coach's system prompt, and the bounded window
//! of recent messages sent with each turn.

use crate::domain::practice::{MessageRole, Transcript, TranscriptEntry};

use super::{FeedbackMessage, FeedbackPayload, FeedbackRecord, FeedbackRole};

const COACH_STYLE: &str = "You are a supportive, conversational feedback coach for a language learner.

STYLE:
- Sound like an encouraging tutor, not a formal report.
- Keep answers concise: 3-7 short sentences.
- Do not use markdown. Write plain text.
- Point to specific moments from the transcript when it helps.
- Give one actionable tip at a time.
- If the learner sounds discouraged, acknowledge their effort before advising.

CONTEXT:
- The learner finished a practice conversation.
- You have their feedback and the original transcript below.";

const COACH_ANSWERING: &str = "WHEN ANSWERING:
- If the question is about an area in the structured feedback, name that area.
- For a broad question, give a short overview and one concrete example.
- If something is not covered by the feedback, say so briefly and suggest something useful instead.

Always finish with exactly one reflective question, such as:
- \"How did that feel on your end?\"
- \"Which tip would you like to try next?\"
- \"Would you like a quick practice line for that?\"";

/// Opening message added when a dialogic session is first started.
pub fn welcome_message(
    first_name: Option<&str>,
    record: &FeedbackRecord,
    section_limit: usize,
) -> String {
    let greeting = match first_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {name}, I'm here"),
        None => "Hi, I'm here".to_string(),
    };

    let areas = record
        .structured()
        .map(|f| f.section_areas(section_limit))
        .unwrap_or_default();

    if areas.is_empty() {
        format!(
            "{greeting} to help you understand your feedback and answer any questions about your practice session.\n\n\
             Feel free to ask what you did well, how to improve in a particular area, \
             for examples from your conversation, or for tips for your next practice session.\n\n\
             What would you like to know more about?"
        )
    } else {
        format!(
            "{greeting} to help you understand your feedback and answer any questions about your practice session.\n\n\
             Your feedback covers {}. Feel free to ask about specific examples from your conversation, \
             how to improve in any of these areas, or tips for your next practice session.\n\n\
             What would you like to explore first?",
            join_areas(&areas)
        )
    }
}

/// Joins area names as "A", "A and B" or "A, B, and C".
fn join_areas(areas: &[&str]) -> String {
    match areas {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// System prompt for a dialogic reply.
pub fn coach_system_prompt(record: &FeedbackRecord, transcript: &Transcript) -> String {
    let feedback = match record.payload() {
        FeedbackPayload::Structured(structured) => match serde_json::to_string_pretty(structured) {
            Ok(json) => format!("STRUCTURED FEEDBACK:\n{json}"),
            Err(_) => format!("ORIGINAL FEEDBACK:\n{}", record.summary()),
        },
        FeedbackPayload::Text(text) => format!("ORIGINAL FEEDBACK:\n{text}"),
    };

    format!(
        "{COACH_STYLE}\n\n{feedback}\n\nORIGINAL PRACTICE TRANSCRIPT:\n{}\n\n{COACH_ANSWERING}",
        transcript.render_for_context()
    )
}

/// The last `limit` dialogic turns, ending with the pending learner message.
pub fn context_window(
    history: &[FeedbackMessage],
    pending_user_message: &str,
    limit: usize,
) -> Vec<TranscriptEntry> {
    let mut turns: Vec<TranscriptEntry> = history
        .iter()
        .map(|m| {
            let role = match m.role {
                FeedbackRole::User => MessageRole::User,
                FeedbackRole::FeedbackAssistant => MessageRole::Assistant,
            };
            TranscriptEntry::new(role, m.content.clone())
        })
        .collect();
    turns.push(TranscriptEntry::user(pending_user_message));

    let skip = turns.len().saturating_sub(limit);
    turns.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::{
        DecodedFeedback, DetailedFeedback, FeedbackSection, FeedbackSummary, StructuredFeedback,
    };
    use crate::domain::foundation::{ConversationId, FeedbackRecordId, UserId};

    fn section(area: &str) -> FeedbackSection {
        FeedbackSection {
            area: area.to_string(),
            strengths: vec!["Clear greeting".into()],
            areas_for_improvement: vec![],
            tips: vec![],
        }
    }

    fn record(decoded: DecodedFeedback) -> FeedbackRecord {
        FeedbackRecord::new(ConversationId::new(), UserId::new("learner").unwrap(), decoded, "gpt-4o")
    }

    fn structured_record(areas: &[&str]) -> FeedbackRecord {
        record(DecodedFeedback::Structured(StructuredFeedback {
            summary: FeedbackSummary {
                strengths: vec![],
                areas_for_improvement: vec![],
            },
            detailed_feedback: DetailedFeedback {
                sections: areas.iter().map(|a| section(a)).collect(),
            },
            encouragement: "Keep going!".into(),
        }))
    }

    mod welcome {
        use super::*;

        #[test]
        fn greets_learner_by_name() {
            let text = welcome_message(Some("Ana"), &structured_record(&[]), 3);
            assert!(text.starts_with("Hi Ana, I'm here"));
        }

        #[test]
        fn blank_name_is_omitted() {
            let text = welcome_message(Some("  "), &structured_record(&[]), 3);
            assert!(text.starts_with("Hi, I'm here"));
        }

        #[test]
        fn names_first_three_areas() {
            let record = structured_record(&["Grammar", "Vocabulary", "Fluency", "Pronunciation"]);
            let text = welcome_message(None, &record, 3);
            assert!(text.contains("Your feedback covers Grammar, Vocabulary, and Fluency."));
            assert!(!text.contains("Pronunciation"));
        }

        #[test]
        fn text_feedback_uses_generic_welcome() {
            let text = welcome_message(None, &record(DecodedFeedback::PlainText("ok".into())), 3);
            assert!(!text.contains("Your feedback covers"));
            assert!(text.ends_with("What would you like to know more about?"));
        }

        #[test]
        fn joins_areas_naturally() {
            assert_eq!(join_areas(&["A"]), "A");
            assert_eq!(join_areas(&["A", "B"]), "A and B");
            assert_eq!(join_areas(&["A", "B", "C"]), "A, B, and C");
        }
    }

    mod system_prompt {
        use super::*;

        fn transcript() -> Transcript {
            Transcript::new(vec![TranscriptEntry::user("Hola"), TranscriptEntry::assistant("¡Hola!")])
        }

        #[test]
        fn embeds_structured_feedback_and_transcript() {
            let prompt = coach_system_prompt(&structured_record(&["Grammar & Syntax"]), &transcript());

            assert!(prompt.contains("STRUCTURED FEEDBACK:"));
            assert!(prompt.contains("\"area\": \"Grammar & Syntax\""));
            assert!(prompt.contains("ORIGINAL PRACTICE TRANSCRIPT:\nStudent: Hola\nAI Partner: ¡Hola!"));
        }

        #[test]
        fn embeds_text_feedback() {
            let prompt = coach_system_prompt(
                &record(DecodedFeedback::PlainText("Work on tenses.".into())),
                &Transcript::default(),
            );
            assert!(prompt.contains("ORIGINAL FEEDBACK:\nWork on tenses."));
            assert!(prompt.contains("No transcript available."));
        }

        #[test]
        fn states_style_contract() {
            let prompt = coach_system_prompt(&structured_record(&[]), &transcript());
            assert!(prompt.contains("3-7 short sentences"));
            assert!(prompt.contains("one actionable tip"));
            assert!(prompt.contains("Do not use markdown"));
            assert!(prompt.contains("exactly one reflective question"));
        }
    }

    mod window {
        use super::*;

        fn history(n: usize) -> Vec<FeedbackMessage> {
            let id = FeedbackRecordId::new();
            (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        FeedbackMessage::assistant(id, format!("reply {i}")).unwrap()
                    } else {
                        FeedbackMessage::user(id, format!("question {i}"), false).unwrap()
                    }
                })
                .collect()
        }

        #[test]
        fn maps_roles_and_appends_pending_message() {
            let turns = context_window(&history(2), "What next?", 10);

            assert_eq!(turns.len(), 3);
            assert_eq!(turns[0].role, MessageRole::Assistant);
            assert_eq!(turns[1].role, MessageRole::User);
            assert_eq!(turns[2], TranscriptEntry::user("What next?"));
        }

        #[test]
        fn keeps_only_most_recent_turns() {
            let turns = context_window(&history(15), "latest", 10);

            assert_eq!(turns.len(), 10);
            assert_eq!(turns[0].content, "reply 6");
            assert_eq!(turns[9].content, "latest");
        }
    }
}
