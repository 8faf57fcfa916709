//! mcp-mem0 - long-term memory over MCP
//!
//! Exposes save/list/search tools over the Model Context Protocol, backed by a
//! mem0 engine that owns embedding, fact extraction and vector storage.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod server;
pub mod types;

pub use error::{McpMem0Error, Result};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
