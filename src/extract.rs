//! Structured-response extraction from model text.
//!
//! Models are asked for a JSON object but may wrap it in a markdown fence or
//! return it bare. [`extract_structured_response`] tries each strategy in
//! order and returns the first JSON object that parses.

use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("model response is empty")]
    Empty,
    #[error("no JSON object found in model response: {0}")]
    NoObject(String),
    #[error("JSON object does not match expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// A candidate-producing extraction strategy.
type Strategy = fn(&str) -> Option<&str>;

const STRATEGIES: &[Strategy] = &[fenced_block, raw_body];

/// Body of the first markdown code fence, preferring a ```` ```json ```` fence.
pub fn fenced_block(raw: &str) -> Option<&str> {
    for opener in ["```json", "```"] {
        if let Some(start) = raw.find(opener) {
            let after_fence = &raw[start + opener.len()..];
            if let Some(end) = after_fence.find("```") {
                return Some(after_fence[..end].trim());
            }
        }
    }
    None
}

/// The whole response, trimmed.
pub fn raw_body(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extract the first JSON object the strategies can find in `raw`.
pub fn extract_structured_response(raw: &str) -> Result<Value, ExtractError> {
    if raw.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    let mut last_error = String::from("no candidate text");
    for strategy in STRATEGIES {
        let Some(candidate) = strategy(raw) else {
            continue;
        };
        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => return Ok(value),
            Ok(other) => last_error = format!("expected an object, got {other}"),
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(ExtractError::NoObject(last_error))
}

/// Extract and deserialize into `T`.
pub fn extract_as<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    let value = extract_structured_response(raw)?;
    Ok(serde_json::from_value(value)?)
}
