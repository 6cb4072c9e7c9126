//! LLM types: upstream wire shapes, errors, and the gateway trait.

use serde::Serialize;
use serde_json::Value;

use crate::protocol::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the upstream AI gateway client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The required credential environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the gateway failed before a response arrived.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The gateway returned a non-success HTTP status.
    #[error("{status} {message}")]
    ApiResponse { status: u16, message: String },

    /// The gateway response body was not valid JSON.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Non-streaming chat-completion request sent to the gateway.
///
/// `messages` are the caller's turns as received, extra fields included.
/// `context` is a gateway extension; OpenAI-compatible servers that do not
/// know it ignore the field.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Value],
    pub stream: bool,
    pub context: &'a Value,
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Provider-neutral async trait for one completion call. Enables mocking in tests.
///
/// Implementations return the raw response document; shape normalization is
/// the caller's job (see [`super::normalize`]).
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send the transcript and context upstream and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the gateway answers with
    /// a non-success status, or the body is not JSON.
    async fn chat(&self, messages: &[Value], context: &Value) -> Result<Value, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
