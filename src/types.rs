//! Core types shared by the tool surface and the engine client

use serde::{Deserialize, Serialize};

/// Identity used for memory scoping when the caller supplies none
pub const DEFAULT_USER_ID: &str = "user";

/// Characters of saved text echoed back in a save confirmation
pub const SAVE_PREVIEW_CHARS: usize = 100;

/// Default number of results for a memory search
pub const DEFAULT_SEARCH_LIMIT: usize = 3;

/// Role of a conversational message sent to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Single conversational record passed to the engine's add operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMessage {
    pub role: MessageRole,
    pub content: String,
}

impl MemoryMessage {
    /// A message authored by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Resolve the caller-supplied user id, falling back to [`DEFAULT_USER_ID`]
/// when it is absent or empty.
pub fn resolve_user_id(user_id: Option<&str>) -> &str {
    match user_id {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_USER_ID,
    }
}

/// Shorten text to `max_chars` characters, appending `...` when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
