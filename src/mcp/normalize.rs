//! Normalization of engine responses into plain memory strings
//!
//! Depending on version and call, mem0 answers with `{"results": [...]}`,
//! a bare array, or something else entirely. Items are usually objects
//! with a `memory` field but may also be bare values.

use serde_json::Value;

/// Stand-in for an item that has no `memory` field
pub const MISSING_CONTENT: &str = "Memory content missing";

/// Shape of an engine response
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineResponse<'a> {
    /// Object carrying a `results` array
    Keyed(&'a [Value]),
    /// Bare array of items
    Sequence(&'a [Value]),
    /// Anything else
    Unrecognized(&'a Value),
}

/// Result of normalizing an engine response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Memories(Vec<String>),
    /// The response was not a recognized shape; holds the raw payload as text
    Unexpected(String),
}

pub fn classify(value: &Value) -> EngineResponse<'_> {
    match value {
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => EngineResponse::Keyed(items),
            _ => EngineResponse::Unrecognized(value),
        },
        Value::Array(items) => EngineResponse::Sequence(items),
        other => EngineResponse::Unrecognized(other),
    }
}

/// Text content of a single memory item
pub fn memory_content(item: &Value) -> String {
    match item {
        Value::Object(map) => match map.get("memory") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => MISSING_CONTENT.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn normalize(value: &Value) -> Normalized {
    match classify(value) {
        EngineResponse::Keyed(items) | EngineResponse::Sequence(items) => {
            Normalized::Memories(items.iter().map(memory_content).collect())
        }
        EngineResponse::Unrecognized(raw) => Normalized::Unexpected(raw.to_string()),
    }
}
