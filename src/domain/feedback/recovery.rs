//! Best-effort recovery of structured feedback from raw model output.
//!
//! Models asked for "only JSON" still wrap it in code fences, mangle key
//! names, stop mid-object, or surround it with prose. [`recover`] runs a
//! fixed sequence of small, pure repair strategies and stops at the first
//! one that yields a valid [`StructuredFeedback`]. It never fails: when
//! nothing can be recovered the raw text is kept as plain-text feedback.
//!
//! # Pipeline
//!
//! 1. [`strip_code_fences`]
//! 2. [`normalize_field_names`]
//! 3. [`balance_braces`]
//! 4. [`parse_strict`] → [`DecodedFeedback::Structured`]
//! 5. [`extract_embedded`] → [`DecodedFeedback::Extracted`]
//! 6. otherwise → [`DecodedFeedback::PlainText`]

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use thiserror::Error;

use super::{FeedbackVersion, StructuredFeedback};

/// Object key containing at least one `*`, preceded by `{` or `,`.
static CORRUPTED_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([{,]\s*)"([A-Za-z_]*\*[A-Za-z_*]*)"(\s*:)"#).expect("corrupted key pattern is valid")
});

/// Greedy span from the first `{` to the last `}`.
static EMBEDDED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("embedded object pattern is valid"));

/// Why a strategy could not produce structured feedback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedResponse {
    #[error("response is not valid feedback JSON: {0}")]
    InvalidJson(String),

    #[error("no JSON object found in response")]
    NoObject,
}

/// Result of decoding a feedback model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFeedback {
    /// The cleaned response parsed directly.
    Structured(StructuredFeedback),
    /// A JSON object was recovered from surrounding text.
    Extracted(StructuredFeedback),
    /// Nothing could be recovered; the raw response is kept as text.
    PlainText(String),
}

impl DecodedFeedback {
    /// The version tag recorded with persisted feedback.
    pub fn version(&self) -> FeedbackVersion {
        match self {
            DecodedFeedback::Structured(_) => FeedbackVersion::Structured,
            DecodedFeedback::Extracted(_) => FeedbackVersion::StructuredExtracted,
            DecodedFeedback::PlainText(_) => FeedbackVersion::FallbackText,
        }
    }

    pub fn structured(&self) -> Option<&StructuredFeedback> {
        match self {
            DecodedFeedback::Structured(f) | DecodedFeedback::Extracted(f) => Some(f),
            DecodedFeedback::PlainText(_) => None,
        }
    }

    /// Learner-facing summary: derived when structured, the raw text otherwise.
    pub fn summary_text(&self) -> String {
        match self {
            DecodedFeedback::Structured(f) | DecodedFeedback::Extracted(f) => f.summary_text(),
            DecodedFeedback::PlainText(text) => text.clone(),
        }
    }
}

/// Runs the full recovery pipeline over a raw model response.
pub fn recover(raw: &str) -> DecodedFeedback {
    let unfenced = strip_code_fences(raw);
    let normalized = normalize_field_names(unfenced);
    let cleaned = balance_braces(&normalized);

    let strict_err = match parse_strict(&cleaned) {
        Ok(feedback) => {
            tracing::debug!(sections = feedback.sections().len(), "Parsed structured feedback");
            return DecodedFeedback::Structured(feedback);
        }
        Err(err) => err,
    };
    tracing::debug!(error = %strict_err, "Strict parse failed, trying embedded object");

    match extract_embedded(&cleaned) {
        Ok(feedback) => {
            tracing::info!(sections = feedback.sections().len(), "Recovered embedded feedback object");
            DecodedFeedback::Extracted(feedback)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Feedback response is not structured, keeping plain text");
            DecodedFeedback::PlainText(raw.trim().to_string())
        }
    }
}

/// Removes a surrounding Markdown code fence, including a language tag.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.split_once('\n') {
            Some((tag, after)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => after,
            _ => rest,
        };
    }

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Rewrites object keys where `_` was replaced with `*`.
///
/// `"areas*for*improvement":` becomes `"areas_for_improvement":` and
/// `"**summary**":` becomes `"summary":`. String values are left alone.
pub fn normalize_field_names(text: &str) -> Cow<'_, str> {
    CORRUPTED_KEY.replace_all(text, |caps: &Captures| {
        let key = caps[2].trim_matches('*').replace('*', "_");
        format!("{}\"{}\"{}", &caps[1], key, &caps[3])
    })
}

/// Appends the `}` characters missing from a tail-truncated object.
///
/// Braces inside JSON string literals are not counted.
pub fn balance_braces(text: &str) -> Cow<'_, str> {
    let (open, close) = count_braces(text);
    if open > close {
        let mut repaired = String::with_capacity(text.len() + (open - close));
        repaired.push_str(text);
        repaired.extend(std::iter::repeat('}').take(open - close));
        Cow::Owned(repaired)
    } else {
        Cow::Borrowed(text)
    }
}

fn count_braces(text: &str) -> (usize, usize) {
    let mut open = 0;
    let mut close = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for c in text.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
    }
    (open, close)
}

/// Parses the whole text as structured feedback.
pub fn parse_strict(text: &str) -> Result<StructuredFeedback, MalformedResponse> {
    serde_json::from_str(text.trim()).map_err(|e| MalformedResponse::InvalidJson(e.to_string()))
}

/// Parses the first greedy `{...}` span of the text as structured feedback.
pub fn extract_embedded(text: &str) -> Result<StructuredFeedback, MalformedResponse> {
    let span = EMBEDDED_OBJECT.find(text).ok_or(MalformedResponse::NoObject)?;
    parse_strict(span.as_str())
}
