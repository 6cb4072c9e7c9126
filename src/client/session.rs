//! Chat session state: transcript, input buffer, loading flag, config banner.
//!
//! DESIGN
//! ======
//! A send is split into two synchronous halves so the caller can hold the
//! session lock only while mutating, never across the network await:
//!
//! - [`ChatSession::begin_send`] validates, appends the user turn, flips
//!   `loading`, and hands back the request to transmit.
//! - [`ChatSession::settle`] appends exactly one assistant turn (reply or
//!   synthesized error) and clears `loading`.
//!
//! While `loading` is set, `begin_send` refuses new turns, so at most one
//! request is outstanding per session.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::transport::ClientError;
use crate::protocol::{ChatContext, ChatReply, ChatRequest, ChatTurn, Role};

/// Greeting shown by front-ends that seed the transcript.
pub const DEFAULT_GREETING: &str = "Hello! I'm your Web3 AI assistant. I can help you with blockchain queries, \
transaction analysis, token swaps, contract interactions, and more. What would you like to know?";

/// Appended when the proxy answers successfully but without text.
pub const EMPTY_REPLY_FALLBACK: &str = "I apologize, but I couldn't generate a response. Please try again.";

/// Banner text set when the proxy reports missing gateway credentials.
pub const CONFIG_ADVISORY: &str =
    "AI gateway is not configured. Please add THIRDWEB_SECRET_KEY to the server environment.";

/// Substring of the proxy's error text that marks a credential problem.
pub const NOT_CONFIGURED_MARKER: &str = "credentials not configured";

// =============================================================================
// MESSAGE
// =============================================================================

/// A single transcript entry. Immutable once appended.
#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self { id: Uuid::new_v4().to_string(), role, content, timestamp: OffsetDateTime::now_utc() }
    }

    /// The `{role, content}` pair replayed upstream.
    #[must_use]
    pub fn turn(&self) -> ChatTurn {
        ChatTurn { role: self.role, content: self.content.clone() }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Why [`ChatSession::begin_send`] declined to start a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    InFlight,
}

#[derive(Clone, Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    loading: bool,
    config_error: Option<String>,
    scroll_pending: bool,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the transcript with an assistant greeting.
    #[must_use]
    pub fn with_greeting(greeting: &str) -> Self {
        let mut session = Self::new();
        session
            .messages
            .push(Message::new(Role::Assistant, greeting.to_string()));
        session
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub(crate) fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn config_error(&self) -> Option<&str> {
        self.config_error.as_deref()
    }

    /// Consume the "scroll the message list to its end" request, if any.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    /// Transcript mapped to `{role, content}` pairs, ids and timestamps stripped.
    #[must_use]
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(Message::turn).collect()
    }

    /// Append the user turn and return the request to send.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] without touching the transcript when `text`
    /// is blank or a request is already in flight.
    pub fn begin_send(&mut self, text: &str, context: &ChatContext) -> Result<ChatRequest, SkipReason> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SkipReason::EmptyInput);
        }
        if self.loading {
            return Err(SkipReason::InFlight);
        }

        self.append(Role::User, text.to_string());
        self.input.clear();
        self.loading = true;
        Ok(ChatRequest::new(self.turns(), context))
    }

    /// Record the outcome of the in-flight request.
    ///
    /// Always appends exactly one assistant message and clears `loading`.
    pub fn settle(&mut self, outcome: Result<ChatReply, ClientError>) {
        match outcome {
            Ok(reply) => {
                let content = if reply.message.trim().is_empty() { EMPTY_REPLY_FALLBACK.to_string() } else { reply.message };
                self.append(Role::Assistant, content);
                self.config_error = None;
            }
            Err(err) => {
                let reason = err.to_string();
                if reason.contains(NOT_CONFIGURED_MARKER) {
                    self.config_error = Some(CONFIG_ADVISORY.to_string());
                }
                self.append(
                    Role::Assistant,
                    format!("I apologize, but I encountered an error: {reason}. Please try again later."),
                );
            }
        }
        self.loading = false;
    }

    fn append(&mut self, role: Role, content: String) {
        self.messages.push(Message::new(role, content));
        self.scroll_pending = true;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
