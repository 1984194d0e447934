//! Turns model text into a [`Recommendation`].
//!
//! Models wrap JSON in Markdown fences or add a sentence before it, so the
//! object is located first and then read field by field. Missing or
//! malformed fields take their defaults; text with no decodable object is an
//! error for the caller to handle.

use crate::error::{LlmError, LlmResult};
use analysis_core::{Action, Recommendation};
use serde_json::{Map, Value};

pub fn decode_recommendation(text: &str) -> LlmResult<Recommendation> {
    let object = json_object(text)
        .ok_or_else(|| LlmError::Decode("no JSON object in model output".to_string()))?;
    let fields: Map<String, Value> = serde_json::from_str(object)?;

    // Each field is read on its own; an odd shape only costs that field.
    Ok(Recommendation {
        action: fields
            .get("recommendation")
            .and_then(Value::as_str)
            .map(Action::from_label)
            .unwrap_or_default(),
        summary: fields.get("summary").and_then(flatten_text).unwrap_or_default(),
        risk_factors: fields.get("risk_factors").map(risk_factors).unwrap_or_default(),
        detailed_analysis: fields
            .get("detailed_analysis")
            .and_then(flatten_text)
            .unwrap_or_default(),
    })
}

/// Strings as-is, objects and arrays as their text values one per line.
fn flatten_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => join_lines(items.iter()),
        Value::Object(map) => join_lines(map.values()),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn join_lines<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values.filter_map(flatten_text).collect::<Vec<_>>().join("\n")
}

/// Keys that usually carry the risk's name when a model sends objects.
const RISK_NAME_KEYS: [&str; 4] = ["factor", "risk", "name", "title"];

/// A list, a single string, or a list of objects named by their first text value.
fn risk_factors(value: &Value) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim()),
            Value::Object(map) => RISK_NAME_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .or_else(|| map.values().find_map(Value::as_str))
                .map(str::trim),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_object(text: &str) -> Option<&str> {
    let body = strip_code_fences(text);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (end > start).then(|| &body[start..=end])
}
