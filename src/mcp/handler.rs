//! MCP request dispatch for the memory tools

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, ToolCallResult,
};
use super::tools::{
    get_all_memories, get_tool_definitions, save_memory, search_memories, GetAllMemoriesInput,
    SaveMemoryInput, SearchMemoriesInput,
};
use crate::engine::SessionContext;
use crate::error::{McpMem0Error, Result};

/// MCP request handler backed by the shared memory engine
#[derive(Clone)]
pub struct MemoryToolHandler {
    session: SessionContext,
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpMem0Error::InvalidInput(e.to_string()))
}

impl MemoryToolHandler {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallResult> {
        let outcome = match name {
            "save_memory" => {
                let input: SaveMemoryInput = parse_arguments(arguments)?;
                save_memory(&self.session, &input.text, input.user_id.as_deref()).await
            }
            "get_all_memories" => {
                let input: GetAllMemoriesInput = parse_arguments(arguments)?;
                get_all_memories(&self.session, input.user_id.as_deref()).await
            }
            "search_memories" => {
                let input: SearchMemoriesInput = parse_arguments(arguments)?;
                search_memories(
                    &self.session,
                    &input.query,
                    input.user_id.as_deref(),
                    input.limit,
                )
                .await
            }
            _ => {
                return Err(McpMem0Error::InvalidInput(format!(
                    "Unknown tool: {}",
                    name
                )))
            }
        };
        Ok(outcome.into_call_result())
    }
}

#[async_trait]
impl McpHandler for MemoryToolHandler {
    async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let notification = request.is_notification();

        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult::default();
                McpResponse::success(request.id, json!(result))
            }
            methods::INITIALIZED | methods::PING => McpResponse::success(request.id, json!({})),
            methods::LIST_TOOLS => {
                let tools = get_tool_definitions();
                McpResponse::success(request.id, json!({"tools": tools}))
            }
            methods::CALL_TOOL => {
                let name = request
                    .params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(Value::Null);

                tracing::debug!(tool = name, "Tool call");
                match self.call_tool(name, arguments).await {
                    Ok(result) => McpResponse::success(request.id, json!(result)),
                    Err(e) => McpResponse::from_error(request.id, e),
                }
            }
            _ => McpResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        };

        if notification {
            None
        } else {
            Some(response)
        }
    }
}
