//! Provider catalogue: names, default models, credentials and embedding sizes

use std::fmt;
use std::str::FromStr;

use crate::error::McpMem0Error;

/// Dimensionality assumed for embedding models missing from [`EMBEDDING_DIMENSIONS`]
pub const DEFAULT_EMBEDDING_DIMS: usize = 768;

/// Known embedding models and the size of the vectors they produce
pub const EMBEDDING_DIMENSIONS: &[(&str, usize)] = &[
    // OpenAI
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
    // Gemini
    ("models/text-embedding-004", 768),
    ("models/embedding-001", 768),
    // Ollama
    ("nomic-embed-text", 768),
    ("mxbai-embed-large", 1024),
    ("all-minilm", 384),
];

/// Look up the embedding size of a known model
pub fn known_embedding_dims(model: &str) -> Option<usize> {
    EMBEDDING_DIMENSIONS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dims)| *dims)
}

pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const OPENROUTER_DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// LLM backends mem0 can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Gemini,
    Ollama,
    OpenRouter,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Gemini => "gemini",
            LlmProvider::Ollama => "ollama",
            LlmProvider::OpenRouter => "openrouter",
        }
    }

    /// Provider name as mem0 expects it. OpenRouter speaks the OpenAI API.
    pub fn mem0_name(&self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "openai",
            other => other.as_str(),
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Gemini => "gemini-1.5-flash-latest",
            LlmProvider::Ollama => "qwen2.5:14b-instruct-8k",
            LlmProvider::OpenRouter => "openai/gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Ollama => Some(OLLAMA_DEFAULT_BASE_URL),
            LlmProvider::OpenRouter => Some(OPENROUTER_DEFAULT_BASE_URL),
            _ => None,
        }
    }

    /// Key inside mem0's llm config that carries the base URL
    pub fn base_url_field(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Ollama => Some("ollama_base_url"),
            LlmProvider::OpenRouter => Some("openrouter_base_url"),
            _ => None,
        }
    }

    /// Environment variable holding the provider's API key, if one is required
    pub fn key_env(&self) -> Option<&'static str> {
        match self {
            LlmProvider::OpenAi => Some("OPENAI_API_KEY"),
            LlmProvider::Gemini => Some("GEMINI_API_KEY"),
            LlmProvider::OpenRouter => Some("OPENROUTER_API_KEY"),
            LlmProvider::Ollama => None,
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = McpMem0Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            "ollama" => Ok(LlmProvider::Ollama),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            _ => Err(McpMem0Error::Config(format!(
                "Unsupported or unspecified LLM_PROVIDER: '{}'. Use one of: openai, gemini, ollama, openrouter",
                s
            ))),
        }
    }
}

/// Embedding backends mem0 can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderProvider {
    OpenAi,
    Gemini,
    Ollama,
}

impl EmbedderProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderProvider::OpenAi => "openai",
            EmbedderProvider::Gemini => "gemini",
            EmbedderProvider::Ollama => "ollama",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            EmbedderProvider::OpenAi => "text-embedding-3-small",
            EmbedderProvider::Gemini => "models/text-embedding-004",
            EmbedderProvider::Ollama => "nomic-embed-text",
        }
    }

    /// The Gemini embedder reads GOOGLE_API_KEY, not GEMINI_API_KEY
    pub fn key_env(&self) -> Option<&'static str> {
        match self {
            EmbedderProvider::OpenAi => Some("OPENAI_API_KEY"),
            EmbedderProvider::Gemini => Some("GOOGLE_API_KEY"),
            EmbedderProvider::Ollama => None,
        }
    }
}

impl fmt::Display for EmbedderProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedderProvider {
    type Err = McpMem0Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(EmbedderProvider::OpenAi),
            "gemini" => Ok(EmbedderProvider::Gemini),
            "ollama" => Ok(EmbedderProvider::Ollama),
            _ => Err(McpMem0Error::Config(format!(
                "Unsupported or unspecified EMBEDDER_PROVIDER: '{}'. Use one of: openai, gemini, ollama",
                s
            ))),
        }
    }
}
