//! Wire types shared by the chat proxy and the chat client.
//!
//! DESIGN
//! ======
//! Both halves of the chat flow speak the same JSON contract on
//! `POST /api/ai-chat`. Keeping the shapes in one module means the client
//! and the proxy cannot drift apart: the client serializes a
//! [`ChatRequest`], the proxy deserializes the same type, and the reply
//! travels back as [`ChatReply`] or [`ErrorBody`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the chat proxy endpoint.
pub const CHAT_PATH: &str = "/api/ai-chat";

// =============================================================================
// ERROR CODES
// =============================================================================

/// Stable, machine-readable classification for errors that cross a
/// boundary (logged by the proxy, surfaced by the client).
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// TRANSCRIPT TURNS
// =============================================================================

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A transcript entry stripped down to what the upstream model sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Wallet metadata attached to a chat request. Never part of the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_ids: Option<Vec<u64>>,
}

impl ChatContext {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.chain_ids.is_none()
    }
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

/// Body of `POST /api/ai-chat`.
///
/// `context` is kept as raw JSON so the proxy forwards whatever the client
/// sent without reinterpreting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ChatRequest {
    /// Build a request from transcript turns and a typed wallet context.
    #[must_use]
    pub fn new(messages: Vec<ChatTurn>, context: &ChatContext) -> Self {
        let context = serde_json::to_value(context).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self { messages, context: Some(context) }
    }
}

/// Successful proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
}

/// Failure response shared by every non-2xx proxy answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: String,
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
