//! Shared test doubles

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use mcp_mem0::engine::{MemoryEngine, SessionContext};
use mcp_mem0::error::{McpMem0Error, Result};
use mcp_mem0::types::MemoryMessage;

/// One call observed by [`FakeEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Add {
        messages: Vec<MemoryMessage>,
        user_id: String,
    },
    GetAll {
        user_id: String,
    },
    Search {
        query: String,
        user_id: String,
        limit: usize,
    },
}

/// In-memory engine returning a canned response and recording every call
#[derive(Default)]
pub struct FakeEngine {
    response: Mutex<Value>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<EngineCall>>,
}

impl FakeEngine {
    pub fn returning(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            ..Default::default()
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Mutex::new(Some(message.to_string())),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn reply(&self, call: EngineCall) -> Result<Value> {
        self.calls.lock().unwrap().push(call);
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(McpMem0Error::Engine(message));
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

#[async_trait]
impl MemoryEngine for FakeEngine {
    async fn add(&self, messages: &[MemoryMessage], user_id: &str) -> Result<Value> {
        self.reply(EngineCall::Add {
            messages: messages.to_vec(),
            user_id: user_id.to_string(),
        })
    }

    async fn get_all(&self, user_id: &str) -> Result<Value> {
        self.reply(EngineCall::GetAll {
            user_id: user_id.to_string(),
        })
    }

    async fn search(&self, query: &str, user_id: &str, limit: usize) -> Result<Value> {
        self.reply(EngineCall::Search {
            query: query.to_string(),
            user_id: user_id.to_string(),
            limit,
        })
    }
}

pub fn session(engine: &Arc<FakeEngine>) -> SessionContext {
    SessionContext::new(engine.clone())
}
