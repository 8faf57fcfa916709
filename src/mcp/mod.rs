//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC over SSE or stdio, exposing the memory tools.

pub mod handler;
pub mod normalize;
pub mod protocol;
pub mod sse;
pub mod stdio;
pub mod tools;

pub use handler::MemoryToolHandler;
pub use protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, ToolCallResult,
};
pub use sse::{SseState, MESSAGES_PATH, SSE_PATH};
pub use stdio::StdioServer;
pub use tools::{get_tool_definitions, ToolOutcome, TOOL_DEFINITIONS};
