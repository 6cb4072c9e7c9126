//! Client → proxy transport.

use std::time::Duration;

use crate::protocol::{CHAT_PATH, ChatReply, ChatRequest, ErrorBody, ErrorCode};

/// Used when a non-2xx proxy answer carries no readable `error` field.
pub const GENERIC_FAILURE: &str = "Failed to get AI response";

const REQUEST_TIMEOUT_SECS: u64 = 180;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Failures between the chat client and the proxy.
///
/// `Display` is the bare reason; the session wraps it into the assistant
/// apology text.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid response from chat proxy: {0}")]
    Decode(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Status { .. } => "E_PROXY_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::Cancelled => "E_CANCELLED",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Cancelled | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// One request/response exchange with the chat proxy. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the request cannot be delivered, the
    /// proxy answers non-2xx, or the body cannot be decoded.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError>;
}

// =============================================================================
// HTTP TRANSPORT
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Target the proxy at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        let endpoint = format!("{}{CHAT_PATH}", base_url.trim_end_matches('/'));
        Ok(Self { http, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::Status { status: status.as_u16(), message: proxy_error_message(&text) });
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn proxy_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
