//! Tolerant extraction of embedding vectors from `data` payloads
//!
//! OpenAI-compatible servers disagree on the shape of `data`. Accepted, in
//! order:
//! - `[{"embedding": [...]}, ...]`
//! - `{"0": {"embedding": [...]}}`
//! - `{"embedding": [...]}`
//! - `{"<anything>": {"embedding": [...]}}` (first entry)

use serde_json::Value;

use super::http_client::truncate;
use crate::domain::{DomainError, EmbeddingVector};

const SAMPLE_LIMIT: usize = 200;

/// Pull the first embedding out of a response, or fail with a diagnostic snapshot
pub fn extract_embedding(response: &Value) -> Result<EmbeddingVector, DomainError> {
    let embedding = response.get("data").and_then(locate_embedding);

    match embedding {
        Some(value) => parse_vector(value, response),
        None => Err(DomainError::protocol(
            "no embedding found in response",
            snapshot(response),
        )),
    }
}

fn locate_embedding(data: &Value) -> Option<&Value> {
    match data {
        Value::Array(items) => items.first()?.get("embedding"),
        Value::Object(map) => {
            // JSON object keys are strings, so integer 0 and "0" are the same lookup
            if let Some(embedding) = map.get("0").and_then(|item| item.get("embedding")) {
                return Some(embedding);
            }
            if let Some(embedding) = map.get("embedding") {
                return Some(embedding);
            }
            map.values()
                .next()
                .filter(|first| first.is_object())
                .and_then(|first| first.get("embedding"))
        }
        _ => None,
    }
}

fn parse_vector(value: &Value, response: &Value) -> Result<EmbeddingVector, DomainError> {
    let items = value.as_array().ok_or_else(|| {
        DomainError::protocol("embedding is not an array", snapshot(response))
    })?;

    if items.is_empty() {
        return Err(DomainError::protocol("embedding is empty", snapshot(response)));
    }

    items
        .iter()
        .map(|item| {
            item.as_f64().map(|f| f as f32).ok_or_else(|| {
                DomainError::protocol(
                    format!("embedding contains a non-numeric value: {}", item),
                    snapshot(response),
                )
            })
        })
        .collect()
}

fn json_type(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "bool",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Response keys, type of `data` and a truncated sample of it
fn snapshot(response: &Value) -> String {
    let keys: Vec<&str> = response
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let data = response.get("data");
    let sample = data
        .map(|d| truncate(&d.to_string(), SAMPLE_LIMIT))
        .unwrap_or_default();

    serde_json::json!({
        "keys": keys,
        "data_type": json_type(data),
        "data_sample": sample,
    })
    .to_string()
}
