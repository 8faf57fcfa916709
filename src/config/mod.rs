//! Engine configuration resolution
//!
//! Turns flags and environment variables into the single immutable
//! [`EngineConfig`] handed to the memory engine at startup. Every
//! provider-specific requirement is checked here so a bad deployment
//! refuses to start instead of failing on the first tool call.

mod providers;

pub use providers::{
    known_embedding_dims, EmbedderProvider, LlmProvider, DEFAULT_EMBEDDING_DIMS,
    EMBEDDING_DIMENSIONS, OLLAMA_DEFAULT_BASE_URL, OPENROUTER_DEFAULT_BASE_URL,
};

use std::fmt;

use serde_json::{json, Map, Value};

use crate::error::{McpMem0Error, Result};

/// Vector store collection used when none is configured
pub const DEFAULT_COLLECTION_NAME: &str = "mem0_memories";

/// Sampling temperature for fact extraction
pub const LLM_TEMPERATURE: f64 = 0.2;

/// Completion budget for fact extraction
pub const LLM_MAX_TOKENS: u32 = 2000;

/// Which MCP transport the server speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Transport {
    /// Server-sent events over HTTP
    #[default]
    Sse,
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
}

/// Raw engine settings, read from flags or the environment
#[derive(clap::Args, Clone, Default)]
pub struct EngineSettings {
    /// LLM provider (openai, gemini, ollama, openrouter)
    #[arg(long, env = "LLM_PROVIDER")]
    pub llm_provider: Option<String>,

    /// LLM model override
    #[arg(long, env = "LLM_CHOICE")]
    pub llm_choice: Option<String>,

    /// API key for the LLM, takes precedence over the provider-specific key
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Base URL for self-hosted or proxied LLMs (ollama, openrouter)
    #[arg(long, env = "LLM_BASE_URL")]
    pub llm_base_url: Option<String>,

    /// Embedder provider (openai, gemini, ollama); defaults to the LLM provider
    #[arg(long, env = "EMBEDDER_PROVIDER")]
    pub embedder_provider: Option<String>,

    /// Embedding model override
    #[arg(long, env = "EMBEDDING_MODEL_CHOICE")]
    pub embedding_model_choice: Option<String>,

    /// API key for the embedder, takes precedence over the provider-specific key
    #[arg(long, env = "EMBEDDER_API_KEY", hide_env_values = true)]
    pub embedder_api_key: Option<String>,

    /// Base URL for a self-hosted embedder (ollama)
    #[arg(long, env = "EMBEDDER_BASE_URL")]
    pub embedder_base_url: Option<String>,

    /// Embedding dimensionality override
    #[arg(long, env = "EMBEDDING_DIMS")]
    pub embedding_dims: Option<usize>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Postgres connection string for the vector store
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Vector store collection name
    #[arg(long, env = "MEM0_COLLECTION")]
    pub collection_name: Option<String>,

    /// Base URL of the mem0 REST server
    #[arg(long, env = "MEM0_BASE_URL")]
    pub mem0_base_url: Option<String>,

    /// Bearer token for the mem0 REST server
    #[arg(long, env = "MEM0_API_KEY", hide_env_values = true)]
    pub mem0_api_key: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl EngineSettings {
    fn provider_key(&self, env_name: &str) -> Option<String> {
        match env_name {
            "OPENAI_API_KEY" => non_empty(&self.openai_api_key),
            "OPENROUTER_API_KEY" => non_empty(&self.openrouter_api_key),
            "GEMINI_API_KEY" => non_empty(&self.gemini_api_key),
            "GOOGLE_API_KEY" => non_empty(&self.google_api_key),
            _ => None,
        }
    }
}

/// LLM section of the engine configuration
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Embedder section of the engine configuration
#[derive(Clone, PartialEq)]
pub struct EmbedderConfig {
    pub provider: EmbedderProvider,
    pub model: String,
    pub embedding_dims: usize,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for EmbedderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("embedding_dims", &self.embedding_dims)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Vector store section of the engine configuration
#[derive(Clone, PartialEq)]
pub struct VectorStoreConfig {
    pub provider: String,
    pub connection_string: String,
    pub collection_name: String,
    pub embedding_model_dims: usize,
}

impl fmt::Debug for VectorStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorStoreConfig")
            .field("provider", &self.provider)
            .field("connection_string", &"<redacted>")
            .field("collection_name", &self.collection_name)
            .field("embedding_model_dims", &self.embedding_model_dims)
            .finish()
    }
}

/// Fully resolved memory engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub llm: LlmConfig,
    pub embedder: EmbedderConfig,
    pub vector_store: VectorStoreConfig,
}

impl EngineConfig {
    /// Validate settings and build the engine configuration.
    ///
    /// Fails when a provider is unset or unsupported, a required API key is
    /// missing, or no vector store connection string is given.
    pub fn resolve(settings: &EngineSettings) -> Result<Self> {
        let llm = resolve_llm(settings)?;
        tracing::info!(provider = %llm.provider, model = %llm.model, "Configured LLM provider");

        let embedder = resolve_embedder(settings, &llm)?;
        tracing::info!(
            provider = %embedder.provider,
            model = %embedder.model,
            dims = embedder.embedding_dims,
            "Configured embedder provider"
        );

        let connection_string = non_empty(&settings.database_url).ok_or_else(|| {
            McpMem0Error::Config(
                "DATABASE_URL environment variable is required for the Supabase vector store"
                    .to_string(),
            )
        })?;

        let vector_store = VectorStoreConfig {
            provider: "supabase".to_string(),
            connection_string,
            collection_name: non_empty(&settings.collection_name)
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
            embedding_model_dims: embedder.embedding_dims,
        };
        tracing::info!(
            collection = %vector_store.collection_name,
            dims = vector_store.embedding_model_dims,
            "Configured vector store: supabase"
        );

        Ok(Self {
            llm,
            embedder,
            vector_store,
        })
    }

    /// Render the configuration in the shape mem0 accepts
    pub fn to_mem0_json(&self) -> Value {
        let mut llm = Map::new();
        llm.insert("model".into(), json!(self.llm.model));
        llm.insert("temperature".into(), json!(self.llm.temperature));
        llm.insert("max_tokens".into(), json!(self.llm.max_tokens));
        if let Some(key) = &self.llm.api_key {
            llm.insert("api_key".into(), json!(key));
        }
        if let (Some(field), Some(url)) = (self.llm.provider.base_url_field(), &self.llm.base_url)
        {
            llm.insert(field.into(), json!(url));
        }

        let mut embedder = Map::new();
        embedder.insert("model".into(), json!(self.embedder.model));
        embedder.insert("embedding_dims".into(), json!(self.embedder.embedding_dims));
        if let Some(key) = &self.embedder.api_key {
            embedder.insert("api_key".into(), json!(key));
        }
        if let Some(url) = &self.embedder.base_url {
            embedder.insert("ollama_base_url".into(), json!(url));
        }

        json!({
            "llm": {
                "provider": self.llm.provider.mem0_name(),
                "config": llm,
            },
            "embedder": {
                "provider": self.embedder.provider.as_str(),
                "config": embedder,
            },
            "vector_store": {
                "provider": self.vector_store.provider,
                "config": {
                    "connection_string": self.vector_store.connection_string,
                    "collection_name": self.vector_store.collection_name,
                    "embedding_model_dims": self.vector_store.embedding_model_dims,
                },
            },
        })
    }
}

fn resolve_llm(settings: &EngineSettings) -> Result<LlmConfig> {
    let provider: LlmProvider = non_empty(&settings.llm_provider)
        .unwrap_or_default()
        .parse()?;

    let api_key = match provider.key_env() {
        Some(env_name) => {
            let key = non_empty(&settings.llm_api_key).or_else(|| settings.provider_key(env_name));
            if key.is_none() {
                return Err(McpMem0Error::Config(format!(
                    "LLM_PROVIDER is '{}' but neither LLM_API_KEY nor {} is set",
                    provider, env_name
                )));
            }
            key
        }
        None => None,
    };

    let base_url = provider.default_base_url().map(|default| {
        non_empty(&settings.llm_base_url).unwrap_or_else(|| default.to_string())
    });

    Ok(LlmConfig {
        provider,
        model: non_empty(&settings.llm_choice)
            .unwrap_or_else(|| provider.default_model().to_string()),
        temperature: LLM_TEMPERATURE,
        max_tokens: LLM_MAX_TOKENS,
        api_key,
        base_url,
    })
}

fn resolve_embedder(settings: &EngineSettings, llm: &LlmConfig) -> Result<EmbedderConfig> {
    let provider: EmbedderProvider = match non_empty(&settings.embedder_provider) {
        Some(name) => name.parse()?,
        None => llm.provider.as_str().parse()?,
    };

    let api_key = match provider.key_env() {
        Some(env_name) => {
            let key =
                non_empty(&settings.embedder_api_key).or_else(|| settings.provider_key(env_name));
            if key.is_none() {
                return Err(McpMem0Error::Config(format!(
                    "EMBEDDER_PROVIDER is '{}' but neither EMBEDDER_API_KEY nor {} is set",
                    provider, env_name
                )));
            }
            key
        }
        None => None,
    };

    let base_url = match provider {
        EmbedderProvider::Ollama => Some(
            non_empty(&settings.embedder_base_url)
                .or_else(|| match llm.provider {
                    LlmProvider::Ollama => llm.base_url.clone(),
                    _ => None,
                })
                .unwrap_or_else(|| OLLAMA_DEFAULT_BASE_URL.to_string()),
        ),
        _ => None,
    };

    let model = non_empty(&settings.embedding_model_choice)
        .unwrap_or_else(|| provider.default_model().to_string());

    let embedding_dims = match settings.embedding_dims {
        Some(0) => {
            return Err(McpMem0Error::Config(
                "EMBEDDING_DIMS must be greater than zero".to_string(),
            ))
        }
        Some(dims) => dims,
        None => known_embedding_dims(&model).unwrap_or_else(|| {
            tracing::warn!(
                model = %model,
                dims = DEFAULT_EMBEDDING_DIMS,
                "Unknown embedding model, assuming default dimensionality"
            );
            DEFAULT_EMBEDDING_DIMS
        }),
    };

    Ok(EmbedderConfig {
        provider,
        model,
        embedding_dims,
        api_key,
        base_url,
    })
}
