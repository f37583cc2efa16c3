use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use practice_feedback::adapters::OpenAIProvider;
use practice_feedback::application::FeedbackSynthesizer;
use practice_feedback::config::{AppConfig, LogFormat, LoggingConfig};
use practice_feedback::domain::feedback::{
    recover, DecodedFeedback, FeedbackVersion, StructuredFeedback,
};
use practice_feedback::domain::foundation::{ConversationId, UserId};
use practice_feedback::domain::practice::{Scenario, Transcript};
use practice_feedback::ports::{CompletionPurpose, RequestMetadata};

#[derive(Debug, Parser)]
#[command(name = "practice-feedback", about = "Feedback for language-practice conversations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize feedback for a transcript with the configured model.
    Synthesize {
        /// Scenario JSON: feedback_instructions, proficiency_level, min_time_secs.
        #[arg(long)]
        scenario: PathBuf,
        /// Transcript JSON: an array of {role, content}.
        #[arg(long)]
        transcript: PathBuf,
    },
    /// Run a saved model reply through feedback recovery. No model call.
    Decode {
        /// File holding the raw model reply.
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    feedback_instructions: String,
    #[serde(default)]
    proficiency_level: String,
    #[serde(default)]
    min_time_secs: i64,
    language_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct FeedbackOutput {
    feedback_version: FeedbackVersion,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback_json: Option<StructuredFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl FeedbackOutput {
    fn new(decoded: &DecodedFeedback, model: Option<String>) -> Self {
        Self {
            feedback_version: decoded.version(),
            summary: decoded.summary_text(),
            feedback_json: decoded.structured().cloned(),
            model,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("practice-feedback error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    let output = match cli.command {
        Command::Synthesize {
            scenario,
            transcript,
        } => synthesize(&config, &scenario, &transcript).await?,
        Command::Decode { input } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            FeedbackOutput::new(&recover(&raw), None)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn synthesize(
    config: &AppConfig,
    scenario_path: &Path,
    transcript_path: &Path,
) -> anyhow::Result<FeedbackOutput> {
    config.validate().context("invalid configuration")?;

    let file: ScenarioFile = read_json(scenario_path)?;
    let mut scenario = Scenario::new(
        file.feedback_instructions,
        file.proficiency_level,
        file.min_time_secs,
    )?;
    if let Some(code) = file.language_code {
        scenario = scenario.with_language_code(code);
    }
    let transcript: Transcript = read_json(transcript_path)?;

    let provider = OpenAIProvider::new(config.ai.openai())?;
    let synthesizer = FeedbackSynthesizer::new(Arc::new(provider))
        .with_timeout(config.feedback.synthesis_timeout());

    let metadata = RequestMetadata::new(
        UserId::new("cli")?,
        ConversationId::new(),
        CompletionPurpose::FeedbackSynthesis,
        uuid::Uuid::new_v4().to_string(),
    );
    let synthesized = synthesizer
        .synthesize(&scenario, &transcript, metadata)
        .await?;

    Ok(FeedbackOutput::new(
        &synthesized.decoded,
        Some(synthesized.model),
    ))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = logging.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
