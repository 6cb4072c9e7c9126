//! Chat proxy service: transcript + context in, one normalized reply out.
//!
//! DESIGN
//! ======
//! Stateless per call. The steps run in a fixed order and the first failure
//! ends the call:
//!
//! 1. credential precondition (no upstream call without it)
//! 2. body validation (no upstream call for malformed input)
//! 3. one non-streaming upstream completion
//! 4. ordered-fallback normalization of whatever shape came back
//!
//! Nothing is retried. A failed call leaves no state behind, so the client
//! can resend the same body.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::llm::normalize::normalize_completion;
use crate::llm::{LlmChat, LlmError};
use crate::protocol::{ChatReply, ChatTurn, ErrorCode};

/// `details` attached to credential and upstream failures.
pub const CONFIG_HINT: &str = "Please check your AI gateway configuration.";
/// `details` attached to validation failures.
pub const VALIDATION_HINT: &str = "Send a JSON body with a non-empty `messages` array of {role, content} turns.";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("AI gateway credentials not configured. Please add THIRDWEB_SECRET_KEY to the server environment.")]
    NotConfigured,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Upstream(#[from] LlmError),
}

impl ProxyError {
    /// Diagnostic hint returned alongside the error text.
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            Self::NotConfigured | Self::Upstream(_) => CONFIG_HINT,
            Self::InvalidRequest(_) => VALIDATION_HINT,
        }
    }
}

impl ErrorCode for ProxyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::InvalidRequest(_) => "E_INVALID_REQUEST",
            Self::Upstream(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Upstream(e) if e.retryable())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A validated request, turns kept exactly as the caller sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedChat {
    pub messages: Vec<Value>,
    /// `{}` when the caller sent no context or `null`.
    pub context: Value,
}

#[derive(Deserialize)]
struct RawChatBody {
    messages: Vec<Value>,
    #[serde(default)]
    context: Option<Value>,
}

/// Parse and validate a raw request body.
///
/// Each turn must read as a [`ChatTurn`]; the original JSON is what gets
/// forwarded, so fields the proxy does not know about survive.
///
/// # Errors
///
/// Returns [`ProxyError::InvalidRequest`] for non-JSON bodies, a missing or
/// non-array `messages`, a turn with an unknown role or non-string content,
/// or an empty transcript.
pub fn parse_request(body: &[u8]) -> Result<ProxiedChat, ProxyError> {
    let raw: RawChatBody = serde_json::from_slice(body).map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;
    if raw.messages.is_empty() {
        return Err(ProxyError::InvalidRequest("messages must not be empty".into()));
    }
    for (i, turn) in raw.messages.iter().enumerate() {
        ChatTurn::deserialize(turn).map_err(|e| ProxyError::InvalidRequest(format!("messages[{i}]: {e}")))?;
    }
    let context = match raw.context {
        None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
        Some(value) => value,
    };
    Ok(ProxiedChat { messages: raw.messages, context })
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Run one proxied chat call.
///
/// # Errors
///
/// See [`ProxyError`]; every variant is terminal for this call.
pub async fn handle_chat(llm: Option<&Arc<dyn LlmChat>>, body: &[u8]) -> Result<ChatReply, ProxyError> {
    let Some(llm) = llm else {
        return Err(ProxyError::NotConfigured);
    };
    let request = parse_request(body)?;

    info!(message_count = request.messages.len(), "proxy: forwarding chat");
    let raw = llm.chat(&request.messages, &request.context).await.map_err(|e| {
        warn!(error = %e, error_code = e.error_code(), retryable = e.retryable(), "proxy: upstream call failed");
        ProxyError::Upstream(e)
    })?;

    let reply = normalize_completion(&raw);
    info!(reply_len = reply.message.len(), has_session = !reply.session_id.is_empty(), "proxy: reply normalized");
    Ok(reply)
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
