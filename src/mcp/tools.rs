//! MCP tools: save, list and search memories

use serde::Deserialize;
use serde_json::json;

use super::normalize::{normalize, Normalized};
use super::protocol::{ToolCallResult, ToolDefinition};
use crate::engine::SessionContext;
use crate::error::McpMem0Error;
use crate::types::{
    preview, resolve_user_id, MemoryMessage, DEFAULT_SEARCH_LIMIT, SAVE_PREVIEW_CHARS,
};

/// All tool definitions: (name, description, input schema)
pub const TOOL_DEFINITIONS: &[(&str, &str, &str)] = &[
    (
        "save_memory",
        "Save information to your long-term memory. Use it to store any information that could be useful later: user preferences, facts, decisions. The full conversation context is passed to the memory engine, which extracts and stores the relevant facts.",
        r#"{
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "The content to store in memory"},
                "user_id": {"type": "string", "description": "User whose memory this belongs to. Defaults to \"user\"."}
            },
            "required": ["text"]
        }"#,
    ),
    (
        "get_all_memories",
        "Get all stored memories for a user. Call this to get the full context of what you already know before answering.",
        r#"{
            "type": "object",
            "properties": {
                "user_id": {"type": "string", "description": "User whose memories to list. Defaults to \"user\"."}
            }
        }"#,
    ),
    (
        "search_memories",
        "Search memories using semantic search. Finds the memories most relevant to the query, ranked by similarity.",
        r#"{
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "What to search for"},
                "user_id": {"type": "string", "description": "User whose memories to search. Defaults to \"user\"."},
                "limit": {"type": "integer", "minimum": 0, "default": 3, "description": "Maximum number of results"}
            },
            "required": ["query"]
        }"#,
    ),
];

/// Parse the static definitions into MCP tool descriptors
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    TOOL_DEFINITIONS
        .iter()
        .map(|(name, description, schema)| ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::from_str(schema).unwrap_or_else(|_| json!({})),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct SaveMemoryInput {
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetAllMemoriesInput {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMemoriesInput {
    pub query: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

/// What a tool call produced.
///
/// Engine failures end up in `Failure` and are still delivered as the tool's
/// result, never as a protocol error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success(String),
    Failure(String),
}

impl ToolOutcome {
    pub fn text(&self) -> &str {
        match self {
            ToolOutcome::Success(text) | ToolOutcome::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }

    pub fn into_call_result(self) -> ToolCallResult {
        match self {
            ToolOutcome::Success(text) => ToolCallResult::text(text),
            ToolOutcome::Failure(text) => ToolCallResult::error(text),
        }
    }
}

/// Render a list/search response. `operation` names the engine call in the
/// unexpected-format payload.
fn render_memories(
    response: &serde_json::Value,
    operation: &str,
    limit: Option<usize>,
) -> serde_json::Result<String> {
    match normalize(response) {
        Normalized::Memories(mut memories) => {
            if let Some(limit) = limit {
                memories.truncate(limit);
            }
            serde_json::to_string_pretty(&memories)
        }
        Normalized::Unexpected(raw) => {
            tracing::warn!(operation, "Unexpected response format from mem0");
            serde_json::to_string(&json!({
                "error": format!("Unexpected format received from mem0.{}", operation),
                "data": raw,
            }))
        }
    }
}

/// Store `text` as a user message in `user_id`'s memory
pub async fn save_memory(ctx: &SessionContext, text: &str, user_id: Option<&str>) -> ToolOutcome {
    let user_id = resolve_user_id(user_id);
    let messages = [MemoryMessage::user(text)];

    match ctx.engine().add(&messages, user_id).await {
        Ok(_) => {
            tracing::debug!(user_id, "Saved memory");
            ToolOutcome::Success(format!(
                "Successfully saved memory for {}: {}",
                user_id,
                preview(text, SAVE_PREVIEW_CHARS)
            ))
        }
        Err(e) => {
            tracing::warn!(user_id, "Error saving memory: {}", e);
            ToolOutcome::Failure(format!("Error saving memory for {}: {}", user_id, e))
        }
    }
}

/// Every memory stored for `user_id`, as a JSON array of strings
pub async fn get_all_memories(ctx: &SessionContext, user_id: Option<&str>) -> ToolOutcome {
    let user_id = resolve_user_id(user_id);

    let rendered = ctx
        .engine()
        .get_all(user_id)
        .await
        .and_then(|response| {
            render_memories(&response, "get_all", None).map_err(McpMem0Error::from)
        });

    match rendered {
        Ok(json) => ToolOutcome::Success(json),
        Err(e) => {
            tracing::warn!(user_id, "Error retrieving memories: {}", e);
            ToolOutcome::Failure(format!(
                "Error retrieving memories for {}: {}",
                user_id, e
            ))
        }
    }
}

/// Up to `limit` memories for `user_id` most relevant to `query`, as a JSON
/// array of strings
pub async fn search_memories(
    ctx: &SessionContext,
    query: &str,
    user_id: Option<&str>,
    limit: usize,
) -> ToolOutcome {
    let user_id = resolve_user_id(user_id);

    let rendered = ctx
        .engine()
        .search(query, user_id, limit)
        .await
        .and_then(|response| {
            render_memories(&response, "search", Some(limit)).map_err(McpMem0Error::from)
        });

    match rendered {
        Ok(json) => ToolOutcome::Success(json),
        Err(e) => {
            tracing::warn!(user_id, "Error searching memories: {}", e);
            ToolOutcome::Failure(format!(
                "Error searching memories for {}: {}",
                user_id, e
            ))
        }
    }
}
