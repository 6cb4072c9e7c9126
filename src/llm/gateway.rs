//! OpenAI-compatible chat-completions client for the AI gateway.
//!
//! One `POST {base_url}/chat/completions` per call, bearer-authenticated
//! with the server-held secret, `stream: false`. The response body is
//! returned as raw JSON because the gateway may answer in either its own
//! `{message, session_id}` shape or the conventional completion shape.

use std::time::Duration;

use serde_json::Value;

use super::config::{GatewayConfig, GatewayTimeouts, SECRET_KEY_VAR};
use super::types::{CompletionRequest, LlmChat, LlmError};

pub struct GatewayClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GatewayClient {
    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when no credential is configured,
    /// or [`LlmError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: GatewayConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .ok_or_else(|| LlmError::MissingApiKey { var: SECRET_KEY_VAR.into() })?;
        Self::new(api_key, config.base_url, config.model, config.timeouts)
    }

    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(api_key: String, base_url: String, model: String, timeouts: GatewayTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self { http, api_key, base_url, model })
    }

    /// Return the configured model identifier (e.g. `"t0"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_json(&self, body: &CompletionRequest<'_>) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::ApiResponse {
                status: status.as_u16(),
                message: upstream_error_message(&text),
            });
        }
        serde_json::from_str(&text).map_err(|e| LlmError::ApiParse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl LlmChat for GatewayClient {
    async fn chat(&self, messages: &[Value], context: &Value) -> Result<Value, LlmError> {
        let body = CompletionRequest { model: &self.model, messages, stream: false, context };
        self.send_json(&body).await
    }
}

// =============================================================================
// ERROR BODY EXTRACTION
// =============================================================================

/// Best-effort human-readable message from a non-2xx gateway body.
///
/// Tries `error.message`, then a string `error`, then `message`; falls back
/// to the raw body text, or `"status code (no body)"` when empty.
pub(crate) fn upstream_error_message(body: &str) -> String {
    if let Ok(root) = serde_json::from_str::<Value>(body) {
        let found = root
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .or_else(|| root.get("error").and_then(Value::as_str))
            .or_else(|| root.get("message").and_then(Value::as_str));
        if let Some(message) = found.filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() { "status code (no body)".to_string() } else { trimmed.to_string() }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
