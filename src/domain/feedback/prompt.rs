//! System prompt for feedback synthesis.
//!
//! The instructor's scenario instructions are wrapped in a response contract
//! that pins the output to the `StructuredFeedback` JSON schema.

/// Schema example shown to the model. Doubles as documentation of the
/// produced artifact.
const SCHEMA_EXAMPLE: &str = r#"{
  "summary": {
    "strengths": ["2-3 things you did well overall"],
    "areas_for_improvement": ["2-3 practical things for you to focus on next"]
  },
  "detailed_feedback": {
    "sections": [
      {
        "area": "Area name, exactly as written in the areas to evaluate",
        "strengths": ["what worked, quoting your conversation", "another success"],
        "areas_for_improvement": ["what to work on at your level", "another aspect"],
        "tips": ["an actionable suggestion", "a practical strategy"]
      }
    ]
  },
  "encouragement": "A short motivating message addressed to you"
}"#;

/// Builds the feedback synthesis system prompt.
pub fn build_feedback_prompt(instructions: &str, proficiency_level: &str) -> String {
    let level = match proficiency_level.trim() {
        "" => "unspecified",
        level => level,
    };

    let mut prompt = String::with_capacity(instructions.len() + SCHEMA_EXAMPLE.len() + 2048);
    prompt.push_str(instructions.trim());
    prompt.push_str("\n\n");

    prompt.push_str("RESPONSE FORMAT:\n");
    prompt.push_str(
        "Respond with ONLY a valid JSON object. Do not add explanations, markdown or code fences.\n\n",
    );

    prompt.push_str("FEEDBACK REQUIREMENTS:\n");
    prompt.push_str(
        "1. Write all feedback in English, whatever language the learner was practicing.\n",
    );
    prompt.push_str(&format!(
        "2. The learner's proficiency level is: {level}. Match the complexity of your feedback and your expectations to this level.\n",
    ));
    prompt.push_str(
        "3. Prioritize communication success over grammatical perfection. Point out errors only when they got in the way of understanding.\n",
    );
    prompt.push_str(
        "4. Address the learner directly as \"you\", never as \"the student\".\n\n",
    );

    prompt.push_str("Use exactly this structure:\n");
    prompt.push_str(SCHEMA_EXAMPLE);
    prompt.push_str("\n\n");

    prompt.push_str("RULES:\n");
    prompt.push_str(
        "- Add one detailed_feedback section per evaluated area that applies to this conversation, and skip areas that do not apply.\n",
    );
    prompt.push_str("- Put 2-3 items in every list.\n");
    prompt.push_str("- Quote the transcript where you can.\n");
    prompt.push_str("- Start your response with { and end it with }.\n");

    prompt
}
