use std::sync::Arc;

use dapp_chat::llm::config::GatewayConfig;
use dapp_chat::llm::{GatewayClient, LlmChat};
use dapp_chat::{routes, state};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Non-fatal: the proxy answers every chat call with a config error instead.
    let config = GatewayConfig::from_env();
    let llm: Option<Arc<dyn LlmChat>> = match GatewayClient::from_config(config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "AI gateway client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI gateway not configured; chat requests will fail");
            None
        }
    };

    let app = routes::app(state::AppState::new(llm));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "dapp-chat proxy listening");
    axum::serve(listener, app).await.expect("server failed");
}
