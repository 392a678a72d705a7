//! Staged repair of the assistant's structured reply.
//!
//! The model is asked for a strict JSON object but does not always produce
//! one. [`repair`] tries, in order, and the first stage that succeeds wins:
//!
//! 1. strict parse of any JSON object into the four-field shape;
//! 2. marker-based extraction when both `"step":` and `"function":` appear;
//! 3. a fixed "try a specific city" reply when extraction does not apply;
//! 4. a reply quoting the user's query when extraction fails internally.
//!
//! Callers never see a parse error. Every repair stage after the first yields
//! a non-empty `content`; a well-formed object without `content` is passed
//! through with it empty, and shells decide how to show that.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::prompt::WEATHER_TOOL_NAME;
use crate::types::StructuredReply;

const STEP_MARKER: &str = "\"step\":";
const FUNCTION_MARKER: &str = "\"function\":";

/// Stage 3 reply.
pub const GENERIC_FALLBACK: &str =
    "I had trouble with that weather query. Please try asking about the weather in a specific city.";

static FUNCTION_FIELD: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#""function":\s*"([^"]+)""#));
static INPUT_FIELD: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#""input":\s*"([^"]+)""#));

/// Which stage produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStage {
    Strict,
    MarkerExtraction,
    GenericFallback,
    QueryFallback,
}

/// Why marker extraction produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Markers missing, or nothing usable between them.
    NotApplicable,
    /// The text had the markers but could not be taken apart.
    Internal(String),
}

/// Normalize raw model output into a displayable reply.
pub fn repair(raw: &str, user_query: &str) -> StructuredReply {
    repair_with_stage(raw, user_query).0
}

/// [`repair`], also reporting which stage produced the reply.
pub fn repair_with_stage(raw: &str, user_query: &str) -> (StructuredReply, RepairStage) {
    if let Some(reply) = parse_strict(raw) {
        return (reply, RepairStage::Strict);
    }
    let outcome = match extract_marked_fields(raw) {
        Ok(reply) => (reply, RepairStage::MarkerExtraction),
        Err(ExtractionError::NotApplicable) => (
            StructuredReply::content_only(GENERIC_FALLBACK),
            RepairStage::GenericFallback,
        ),
        Err(ExtractionError::Internal(cause)) => {
            tracing::debug!(%cause, "marker extraction failed");
            (query_fallback(user_query), RepairStage::QueryFallback)
        }
    };
    tracing::debug!(stage = ?outcome.1, "repaired malformed model output");
    outcome
}

/// Stage 1: strict parse. Any JSON object is accepted as-is: unknown fields
/// are ignored, missing fields stay absent, and a missing `content` is empty.
pub fn parse_strict(raw: &str) -> Option<StructuredReply> {
    let Value::Object(fields) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };
    let text_field = |name: &str| match fields.get(name)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    };
    Some(StructuredReply {
        step: text_field("step"),
        content: text_field("content").unwrap_or_default(),
        function: text_field("function"),
        input: text_field("input"),
    })
}

/// Stage 2: pull fields out of almost-JSON using the `step`/`function` markers.
///
/// The step value is the first quoted token after `"step":`. Content is the
/// text between the end of that value and `"function":`, stripped of the
/// separating comma, surrounding quotes/whitespace/commas, and a leftover
/// `content":` label. Dropping that label goes past a plain trim on purpose,
/// since it would otherwise show up in the reply. `function` and `input` are
/// searched anywhere.
pub fn extract_marked_fields(raw: &str) -> Result<StructuredReply, ExtractionError> {
    let (Some(step_at), Some(function_at)) = (raw.find(STEP_MARKER), raw.find(FUNCTION_MARKER))
    else {
        return Err(ExtractionError::NotApplicable);
    };

    let after_marker = step_at + STEP_MARKER.len();
    let step_open = raw[after_marker..]
        .find('"')
        .map(|i| after_marker + i + 1)
        .ok_or_else(|| ExtractionError::Internal("step value is not quoted".into()))?;
    let step_close = raw[step_open..]
        .find('"')
        .map(|i| step_open + i)
        .ok_or_else(|| ExtractionError::Internal("step value is unterminated".into()))?;
    if function_at <= step_close {
        return Err(ExtractionError::Internal(
            "function marker precedes the end of the step value".into(),
        ));
    }

    let content = clean_content(&raw[step_close + 1..function_at]);
    if content.is_empty() {
        return Err(ExtractionError::NotApplicable);
    }

    let function = first_capture(&FUNCTION_FIELD, raw)?
        .unwrap_or_else(|| WEATHER_TOOL_NAME.to_string());
    let input = first_capture(&INPUT_FIELD, raw)?.unwrap_or_default();

    Ok(StructuredReply {
        step: Some(raw[step_open..step_close].to_string()),
        content,
        function: Some(function),
        input: Some(input),
    })
}

/// Stage 4 reply.
pub fn query_fallback(user_query: &str) -> StructuredReply {
    StructuredReply::content_only(format!(
        "I had trouble processing your query about '{user_query}'. Please try asking about the weather in a different way."
    ))
}

fn clean_content(between: &str) -> String {
    let mut text = between.trim();
    if let Some(rest) = text.strip_prefix(',') {
        text = rest.trim();
    }
    let text = trim_field_noise(text);
    match text.strip_prefix("content\"") {
        Some(rest) => trim_field_noise(rest.trim_start().trim_start_matches(':')).to_string(),
        None => text.to_string(),
    }
}

fn trim_field_noise(text: &str) -> &str {
    text.trim_matches(|c: char| c == '"' || c == ',' || c.is_whitespace())
}

fn first_capture(
    pattern: &'static LazyLock<Result<Regex, regex::Error>>,
    raw: &str,
) -> Result<Option<String>, ExtractionError> {
    let regex = LazyLock::force(pattern)
        .as_ref()
        .map_err(|e| ExtractionError::Internal(e.to_string()))?;
    Ok(regex
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}
