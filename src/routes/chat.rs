//! `POST /api/ai-chat`: the chat proxy endpoint.
//!
//! The body is taken as raw bytes so malformed JSON surfaces as a
//! [`ProxyError::InvalidRequest`] in the shared `{error, details}` shape
//! instead of the extractor's plain-text rejection.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::warn;

use crate::protocol::{ChatReply, ErrorBody, ErrorCode};
use crate::services::proxy::{self, ProxyError};
use crate::state::AppState;

/// Forward a transcript upstream and return one reply.
pub async fn ai_chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, ProxyError> {
    let reply = proxy::handle_chat(state.llm.as_ref(), &body).await?;
    Ok(Json(reply))
}

pub(crate) fn proxy_error_to_status(err: &ProxyError) -> StatusCode {
    match err {
        // Clients only distinguish success from failure; the body carries the cause.
        ProxyError::NotConfigured | ProxyError::InvalidRequest(_) | ProxyError::Upstream(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = proxy_error_to_status(&self);
        warn!(error = %self, error_code = self.error_code(), status = status.as_u16(), "ai-chat: request failed");
        let body = ErrorBody { error: self.to_string(), details: self.details().to_string() };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
