//! Memory engine seam
//!
//! The engine (mem0) owns fact extraction, embeddings and vector storage.
//! This crate only talks to it through [`MemoryEngine`] and keeps one
//! shared handle per process in a [`SessionContext`].

mod mem0;

pub use mem0::{Mem0Client, DEFAULT_MEM0_BASE_URL};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::MemoryMessage;

/// Operations the tool surface needs from a memory engine.
///
/// Responses are returned untyped; their shape varies between engine
/// versions and is normalized by [`crate::mcp::normalize`].
#[async_trait]
pub trait MemoryEngine: Send + Sync {
    /// Extract and store memories from a conversation, scoped to `user_id`
    async fn add(&self, messages: &[MemoryMessage], user_id: &str) -> Result<Value>;

    /// Every memory stored for `user_id`
    async fn get_all(&self, user_id: &str) -> Result<Value>;

    /// Memories for `user_id` most relevant to `query`, at most `limit` of them
    async fn search(&self, query: &str, user_id: &str, limit: usize) -> Result<Value>;
}

/// Process-wide handle to the memory engine.
///
/// Built once at startup and cloned into every transport; clones share the
/// same engine.
#[derive(Clone)]
pub struct SessionContext {
    engine: Arc<dyn MemoryEngine>,
}

impl SessionContext {
    pub fn new(engine: Arc<dyn MemoryEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &dyn MemoryEngine {
        self.engine.as_ref()
    }
}
