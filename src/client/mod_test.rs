use super::*;
use crate::client::input::{Key, KeyPress};
use crate::protocol::{ChatRequest, Role};
use std::time::Duration;
use tokio::sync::Notify;

// =========================================================================
// Mock transports
// =========================================================================

/// Replies immediately and records every request it saw.
struct RecordingTransport {
    reply: Result<String, String>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl RecordingTransport {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(text.into()), seen: Mutex::new(Vec::new()) })
    }

    fn err(message: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(message.into()), seen: Mutex::new(Vec::new()) })
    }

    fn sent(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(ChatReply { message: text.clone(), session_id: "sess".into() }),
            Err(message) => Err(ClientError::Status { status: 500, message: message.clone() }),
        }
    }
}

/// Holds every request until the gate is opened.
struct GatedTransport {
    gate: Notify,
}

#[async_trait::async_trait]
impl ChatTransport for GatedTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.gate.notified().await;
        Ok(ChatReply { message: "finally".into(), session_id: String::new() })
    }
}

/// Never answers.
struct StalledTransport;

#[async_trait::async_trait]
impl ChatTransport for StalledTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<ChatReply, ClientError> {
        std::future::pending().await
    }
}

fn no_wallet() -> ChatContext {
    ChatContext::default()
}

// =========================================================================
// send_message
// =========================================================================

#[tokio::test]
async fn send_appends_user_and_assistant_turns() {
    let transport = RecordingTransport::ok("hello!");
    let client = ChatClient::new(ChatSession::new(), transport.clone());

    let outcome = client.send_message("hi", &no_wallet()).await;
    assert_eq!(outcome, SendOutcome::Replied);

    let session = client.snapshot();
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[0].role, Role::User);
    assert_eq!(session.messages()[1].content, "hello!");
    assert!(!session.is_loading());
    assert_eq!(transport.sent(), 1);
}

#[tokio::test]
async fn failed_send_still_appends_one_reply() {
    let transport = RecordingTransport::err("AI gateway credentials not configured. Please add THIRDWEB_SECRET_KEY.");
    let client = ChatClient::new(ChatSession::new(), transport);

    let outcome = client.send_message("hi", &no_wallet()).await;
    assert_eq!(outcome, SendOutcome::Failed { error_code: "E_PROXY_STATUS" });

    let session = client.snapshot();
    assert_eq!(session.messages().len(), 2);
    assert!(session.messages()[1].content.starts_with("I apologize, but I encountered an error:"));
    assert!(session.config_error().is_some());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn blank_send_makes_no_request() {
    let transport = RecordingTransport::ok("unused");
    let client = ChatClient::new(ChatSession::new(), transport.clone());

    let outcome = client.send_message("  ", &no_wallet()).await;
    assert_eq!(outcome, SendOutcome::Skipped(SkipReason::EmptyInput));
    assert!(client.snapshot().messages().is_empty());
    assert_eq!(transport.sent(), 0);
}

#[tokio::test]
async fn context_is_passed_per_send() {
    let transport = RecordingTransport::ok("ok");
    let client = ChatClient::new(ChatSession::new(), transport.clone());

    let wallet = WalletConnection::connected("0xabc", Some(10));
    client.send_message("one", &ChatContext::from_wallet(&wallet)).await;
    client.send_message("two", &no_wallet()).await;

    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen[0].context, Some(serde_json::json!({ "from": "0xabc", "chain_ids": [10] })));
    assert_eq!(seen[1].context, Some(serde_json::json!({})));
    assert_eq!(seen[1].messages.len(), 3);
}

#[tokio::test]
async fn concurrent_send_is_rejected_while_in_flight() {
    let transport = Arc::new(GatedTransport { gate: Notify::new() });
    let client = ChatClient::new(ChatSession::new(), transport.clone());

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.send_message("one", &ChatContext::default()).await })
    };
    while !client.snapshot().is_loading() {
        tokio::task::yield_now().await;
    }

    let second = client.send_message("two", &no_wallet()).await;
    assert_eq!(second, SendOutcome::Skipped(SkipReason::InFlight));
    assert_eq!(client.snapshot().messages().len(), 1);

    transport.gate.notify_one();
    assert_eq!(first.await.unwrap(), SendOutcome::Replied);

    let session = client.snapshot();
    let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["one", "finally"]);
    assert!(!session.is_loading());
}

#[tokio::test]
async fn dropped_send_settles_with_cancellation() {
    let client = ChatClient::new(ChatSession::new(), Arc::new(StalledTransport));

    let timed_out = tokio::time::timeout(Duration::from_millis(20), client.send_message("hi", &no_wallet())).await;
    assert!(timed_out.is_err());

    let session = client.snapshot();
    assert!(!session.is_loading());
    assert_eq!(session.messages().len(), 2);
    assert!(session.messages()[1].content.contains("request cancelled"));
}

// =========================================================================
// handle_key
// =========================================================================

#[tokio::test]
async fn enter_submits_exactly_once() {
    let transport = RecordingTransport::ok("ok");
    let client = ChatClient::new(ChatSession::new(), transport.clone());
    client.with_session(|s| s.set_input("gm"));

    let outcome = client.handle_key(KeyPress::plain(Key::Enter), &no_wallet()).await;
    assert_eq!(outcome, Some(SendOutcome::Replied));
    assert_eq!(transport.sent(), 1);
    assert_eq!(client.snapshot().input(), "");
}

#[tokio::test]
async fn shift_enter_inserts_line_break_without_sending() {
    let transport = RecordingTransport::ok("ok");
    let client = ChatClient::new(ChatSession::new(), transport.clone());
    client.with_session(|s| s.set_input("line one"));

    let outcome = client.handle_key(KeyPress::shifted(Key::Enter), &no_wallet()).await;
    assert_eq!(outcome, None);
    assert_eq!(transport.sent(), 0);
    assert_eq!(client.snapshot().input(), "line one\n");
    assert!(client.snapshot().messages().is_empty());
}

#[tokio::test]
async fn typed_keys_build_multiline_message() {
    let transport = RecordingTransport::ok("ok");
    let client = ChatClient::new(ChatSession::new(), transport.clone());

    for press in [
        KeyPress::plain(Key::Char('a')),
        KeyPress::shifted(Key::Enter),
        KeyPress::plain(Key::Char('b')),
    ] {
        assert_eq!(client.handle_key(press, &no_wallet()).await, None);
    }
    client.handle_key(KeyPress::plain(Key::Enter), &no_wallet()).await;

    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen[0].messages[0].content, "a\nb");
}

#[tokio::test]
async fn enter_on_empty_input_does_not_send() {
    let transport = RecordingTransport::ok("ok");
    let client = ChatClient::new(ChatSession::new(), transport.clone());

    let outcome = client.handle_key(KeyPress::plain(Key::Enter), &no_wallet()).await;
    assert_eq!(outcome, Some(SendOutcome::Skipped(SkipReason::EmptyInput)));
    assert_eq!(transport.sent(), 0);
}
