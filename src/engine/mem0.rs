//! mem0 REST client
//!
//! Speaks to a mem0 server (`/configure`, `/memories`, `/search`). The
//! resolved [`EngineConfig`] is pushed once at connect time; after that the
//! client is read-only and safe to share across tasks.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::MemoryEngine;
use crate::config::{EngineConfig, EngineSettings};
use crate::error::{McpMem0Error, Result};
use crate::types::MemoryMessage;

/// Where a locally running mem0 server listens by default
pub const DEFAULT_MEM0_BASE_URL: &str = "http://localhost:8000";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a mem0 server
pub struct Mem0Client {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl Mem0Client {
    /// Create a client without configuring the server
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MEM0_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Create a client and push `config` to the server.
    ///
    /// Any failure here means the engine is unusable, so callers should
    /// treat it as fatal.
    pub async fn connect(settings: &EngineSettings, config: &EngineConfig) -> Result<Self> {
        let client = Self::new(settings.mem0_base_url.clone(), settings.mem0_api_key.clone())?;
        tracing::info!(base_url = %client.base_url, "Initializing mem0 with resolved config");
        client.configure(config).await?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the server's engine configuration
    pub async fn configure(&self, config: &EngineConfig) -> Result<()> {
        let request = self
            .request(reqwest::Method::POST, "/configure")
            .json(&config.to_mem0_json());
        if let Err(e) = self.send(request).await {
            tracing::error!("Error during mem0 initialization: {}", e);
            return Err(e);
        }
        Ok(())
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(McpMem0Error::Engine(format!(
                "mem0 API error {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MemoryEngine for Mem0Client {
    async fn add(&self, messages: &[MemoryMessage], user_id: &str) -> Result<Value> {
        let request = self
            .request(reqwest::Method::POST, "/memories")
            .json(&json!({
                "messages": messages,
                "user_id": user_id,
            }));
        self.send(request).await
    }

    async fn get_all(&self, user_id: &str) -> Result<Value> {
        let request = self
            .request(reqwest::Method::GET, "/memories")
            .query(&[("user_id", user_id)]);
        self.send(request).await
    }

    async fn search(&self, query: &str, user_id: &str, limit: usize) -> Result<Value> {
        let request = self
            .request(reqwest::Method::POST, "/search")
            .json(&json!({
                "query": query,
                "user_id": user_id,
                "limit": limit,
            }));
        self.send(request).await
    }
}
