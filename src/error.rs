//! Error types for mcp-mem0

use thiserror::Error;

/// Result type alias for mcp-mem0 operations
pub type Result<T> = std::result::Result<T, McpMem0Error>;

/// Main error type for mcp-mem0
#[derive(Error, Debug)]
pub enum McpMem0Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Memory engine error: {0}")]
    Engine(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

}

impl McpMem0Error {
    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            McpMem0Error::InvalidInput(_) => -32602,
            _ => -32000,
        }
    }
}
