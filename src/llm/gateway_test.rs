use super::*;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use serde_json::json;
use std::sync::{Arc, Mutex};

// =========================================================================
// Fake gateway
// =========================================================================

#[derive(Clone)]
struct FakeGateway {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Option<(String, Value)>>>,
}

async fn fake_completions(State(fake): State<FakeGateway>, headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    *fake.seen.lock().unwrap() = Some((auth, body));
    (fake.status, fake.body.clone())
}

async fn spawn_gateway(status: StatusCode, body: &str) -> (String, Arc<Mutex<Option<(String, Value)>>>) {
    let seen = Arc::new(Mutex::new(None));
    let fake = FakeGateway { status, body: body.to_string(), seen: seen.clone() };
    let app = Router::new()
        .route("/ai/chat/completions", post(fake_completions))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/ai/"), seen)
}

fn client_for(base_url: String) -> GatewayClient {
    GatewayClient::new(
        "sk-test".into(),
        base_url,
        "t0".into(),
        GatewayTimeouts { request_secs: 5, connect_secs: 5 },
    )
    .unwrap()
}

fn hi() -> Vec<Value> {
    vec![json!({ "role": "user", "content": "hi" })]
}

// =========================================================================
// chat
// =========================================================================

#[tokio::test]
async fn chat_posts_completion_request_with_bearer() {
    let (base, seen) = spawn_gateway(StatusCode::OK, r#"{"id":"cmpl-1","choices":[]}"#).await;
    let client = client_for(base);

    let context = json!({ "from": "0xabc" });
    let value = client.chat(&hi(), &context).await.unwrap();
    assert_eq!(value.get("id").and_then(Value::as_str), Some("cmpl-1"));

    let (auth, body) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(auth, "Bearer sk-test");
    assert_eq!(
        body,
        json!({
            "model": "t0",
            "messages": [{ "role": "user", "content": "hi" }],
            "stream": false,
            "context": { "from": "0xabc" }
        })
    );
}

#[tokio::test]
async fn chat_maps_error_status_with_upstream_message() {
    let (base, _) = spawn_gateway(StatusCode::UNAUTHORIZED, r#"{"error":{"message":"invalid secret key"}}"#).await;
    let err = client_for(base).chat(&hi(), &json!({})).await.unwrap_err();
    match err {
        LlmError::ApiResponse { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid secret key");
        }
        other => panic!("expected ApiResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_rejects_non_json_body() {
    let (base, _) = spawn_gateway(StatusCode::OK, "<html>gateway</html>").await;
    let err = client_for(base).chat(&hi(), &json!({})).await.unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[tokio::test]
async fn chat_reports_unreachable_gateway() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(format!("http://{addr}"))
        .chat(&hi(), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ApiRequest(_)));
}

// =========================================================================
// from_config
// =========================================================================

#[test]
fn from_config_requires_key() {
    let config = GatewayConfig {
        api_key: None,
        base_url: "https://gateway.example".into(),
        model: "t0".into(),
        timeouts: GatewayTimeouts { request_secs: 1, connect_secs: 1 },
    };
    let Err(err) = GatewayClient::from_config(config) else {
        panic!("expected missing key error");
    };
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == SECRET_KEY_VAR));
}

#[test]
fn from_config_keeps_model() {
    let config = GatewayConfig {
        api_key: Some("sk".into()),
        base_url: "https://gateway.example/".into(),
        model: "t0".into(),
        timeouts: GatewayTimeouts { request_secs: 1, connect_secs: 1 },
    };
    let client = GatewayClient::from_config(config).unwrap();
    assert_eq!(client.model(), "t0");
    assert_eq!(client.base_url, "https://gateway.example");
}

// =========================================================================
// upstream_error_message
// =========================================================================

#[test]
fn error_message_prefers_nested_error_message() {
    assert_eq!(upstream_error_message(r#"{"error":{"message":"bad key"},"message":"other"}"#), "bad key");
}

#[test]
fn error_message_accepts_string_error() {
    assert_eq!(upstream_error_message(r#"{"error":"quota exhausted"}"#), "quota exhausted");
}

#[test]
fn error_message_accepts_top_level_message() {
    assert_eq!(upstream_error_message(r#"{"message":"upstream down"}"#), "upstream down");
}

#[test]
fn error_message_falls_back_to_raw_text() {
    assert_eq!(upstream_error_message("  Bad Gateway \n"), "Bad Gateway");
    assert_eq!(upstream_error_message(""), "status code (no body)");
}
