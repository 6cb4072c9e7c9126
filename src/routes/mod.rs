//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The proxy exposes one chat endpoint plus a health check. CORS is open so
//! a browser widget served from another origin can reach the proxy; the
//! trace layer logs one span per request.

pub mod chat;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::protocol::CHAT_PATH;
use crate::state::AppState;

/// Build the full HTTP router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(CHAT_PATH, post(chat::ai_chat))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
