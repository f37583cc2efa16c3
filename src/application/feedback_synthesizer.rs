//! FeedbackSynthesizer - turns a practice transcript into decoded feedback.
//!
//! Builds the feedback prompt from the scenario, calls the model exactly once
//! under a timeout, and runs the reply through the recovery pipeline. Decode
//! problems never fail synthesis; they degrade to plain-text feedback.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::feedback::{build_feedback_prompt, recover, DecodedFeedback};
use crate::domain::practice::{Scenario, Transcript};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, TokenUsage};

/// Default upper bound on one synthesis call.
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors that stop feedback synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Missing feedback instructions or model credentials.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model call failed or timed out.
    #[error("AI provider error: {0}")]
    Upstream(#[source] AIError),
}

impl From<AIError> for SynthesisError {
    fn from(err: AIError) -> Self {
        if err.is_configuration() {
            SynthesisError::Configuration(err.to_string())
        } else {
            SynthesisError::Upstream(err)
        }
    }
}

/// Feedback produced by one synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesizedFeedback {
    pub decoded: DecodedFeedback,
    /// Model that produced the reply.
    pub model: String,
    pub usage: TokenUsage,
}

/// Synthesizes feedback through an injected model provider.
#[derive(Clone)]
pub struct FeedbackSynthesizer {
    provider: Arc<dyn AIProvider>,
    timeout: Duration,
}

impl FeedbackSynthesizer {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Synthesizes feedback for a transcript.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the scenario has no feedback instructions or the
    ///   provider has no credentials
    /// - `Upstream` if the model call fails or exceeds the timeout
    pub async fn synthesize(
        &self,
        scenario: &Scenario,
        transcript: &Transcript,
        metadata: RequestMetadata,
    ) -> Result<SynthesizedFeedback, SynthesisError> {
        let instructions = scenario.feedback_instructions().ok_or_else(|| {
            SynthesisError::Configuration(format!(
                "Scenario {} has no feedback instructions",
                scenario.id
            ))
        })?;

        let trace_id = metadata.trace_id.clone();
        let request = CompletionRequest::new(metadata)
            .with_system_prompt(build_feedback_prompt(instructions, &scenario.proficiency_level))
            .with_message(MessageRole::User, transcript.flatten());

        tracing::debug!(
            trace_id = %trace_id,
            messages = transcript.len(),
            transcript = %transcript.flatten(),
            "Requesting feedback synthesis"
        );

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| AIError::timeout(self.timeout.as_secs()))??;

        let decoded = recover(&response.content);
        tracing::info!(
            trace_id = %trace_id,
            model = %response.model,
            feedback_version = %decoded.version(),
            total_tokens = response.usage.total_tokens,
            "Feedback synthesized"
        );

        Ok(SynthesizedFeedback {
            decoded,
            model: response.model,
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::feedback::FeedbackVersion;
    use crate::domain::foundation::{ConversationId, UserId};
    use crate::domain::practice::TranscriptEntry;
    use crate::ports::CompletionPurpose;

    const STRUCTURED: &str = r#"{"summary":{"strengths":["Good greeting"],"areas_for_improvement":["Verb conjugation"]},"detailed_feedback":{"sections":[]},"encouragement":"Keep going!"}"#;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(
            UserId::new("learner").unwrap(),
            ConversationId::new(),
            CompletionPurpose::FeedbackSynthesis,
            "trace-1",
        )
    }

    fn scenario() -> Scenario {
        Scenario::new("Evaluate greetings.", "Beginner", 60).unwrap()
    }

    fn transcript() -> Transcript {
        Transcript::new(vec![
            TranscriptEntry::user("Hola"),
            TranscriptEntry::assistant("¡Hola! ¿Cómo estás?"),
        ])
    }

    #[tokio::test]
    async fn sends_prompt_and_flattened_transcript_once() {
        let provider = Arc::new(MockAIProvider::new().with_response(STRUCTURED));
        let synthesizer = FeedbackSynthesizer::new(provider.clone());

        synthesizer.synthesize(&scenario(), &transcript(), metadata()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        let call = provider.last_call().unwrap();
        let system = call.system_prompt.unwrap();
        assert!(system.starts_with("Evaluate greetings."));
        assert!(system.contains("proficiency level is: Beginner"));
        assert_eq!(call.messages.len(), 1);
        assert_eq!(call.messages[0].content, "user: Hola\nassistant: ¡Hola! ¿Cómo estás?");
    }

    #[tokio::test]
    async fn structured_reply_is_decoded() {
        let provider = Arc::new(MockAIProvider::new().with_response(STRUCTURED));
        let result = FeedbackSynthesizer::new(provider)
            .synthesize(&scenario(), &transcript(), metadata())
            .await
            .unwrap();

        assert_eq!(result.decoded.version(), FeedbackVersion::Structured);
        assert_eq!(result.model, "mock-model-1");
    }

    #[tokio::test]
    async fn prose_reply_degrades_to_plain_text() {
        let provider = Arc::new(MockAIProvider::new().with_response("Great effort today!"));
        let result = FeedbackSynthesizer::new(provider)
            .synthesize(&scenario(), &transcript(), metadata())
            .await
            .unwrap();

        assert_eq!(result.decoded, DecodedFeedback::PlainText("Great effort today!".into()));
    }

    #[tokio::test]
    async fn missing_instructions_fail_before_model_call() {
        let provider = Arc::new(MockAIProvider::new());
        let mut scenario = scenario();
        scenario.feedback_instructions = Some("   ".into());

        let err = FeedbackSynthesizer::new(provider.clone())
            .synthesize(&scenario, &transcript(), metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::Configuration(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_credentials_is_configuration_error() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::MissingCredentials));

        let err = FeedbackSynthesizer::new(provider)
            .synthesize(&scenario(), &transcript(), metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::Configuration(_)));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".into(),
        }));

        let err = FeedbackSynthesizer::new(provider)
            .synthesize(&scenario(), &transcript(), metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::Upstream(AIError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_response(STRUCTURED)
                .with_delay(Duration::from_millis(200)),
        );

        let err = FeedbackSynthesizer::new(provider)
            .with_timeout(Duration::from_millis(20))
            .synthesize(&scenario(), &transcript(), metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::Upstream(AIError::Timeout { .. })));
    }
}
