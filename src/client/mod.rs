//! Chat client: owns the transcript and drives one request per user turn.
//!
//! DESIGN
//! ======
//! [`ChatClient`] wraps a [`ChatSession`] in a mutex that is only held while
//! the session is mutated, never across the transport await. A second
//! `send_message` that arrives while a request is outstanding sees the
//! loading flag and is rejected without touching the transcript.
//!
//! The lock is a `std::sync::Mutex` rather than a tokio lock: no guard ever
//! lives across an `.await`, so there is nothing for an async lock to yield on.
//!
//! If the send future is dropped mid-flight, the in-flight guard settles the
//! turn with [`ClientError::Cancelled`], so every user turn still gets
//! exactly one assistant reply and `loading` is always cleared.

pub mod context;
pub mod input;
pub mod session;
pub mod transport;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::protocol::{ChatContext, ChatReply, ErrorCode};
pub use context::WalletConnection;
use input::KeyPress;
pub use session::{ChatSession, Message, SkipReason};
pub use transport::{ChatTransport, ClientError, HttpTransport};

/// Result of one `send_message` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended.
    Skipped(SkipReason),
    /// The proxy answered; its reply was appended.
    Replied,
    /// The exchange failed; a synthesized apology was appended.
    Failed { error_code: &'static str },
}

#[derive(Clone)]
pub struct ChatClient {
    session: Arc<Mutex<ChatSession>>,
    transport: Arc<dyn ChatTransport>,
}

impl ChatClient {
    #[must_use]
    pub fn new(session: ChatSession, transport: Arc<dyn ChatTransport>) -> Self {
        Self { session: Arc::new(Mutex::new(session)), transport }
    }

    /// Copy of the current session state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ChatSession {
        lock(&self.session).clone()
    }

    /// Run `f` against the live session (e.g. to drain the scroll request).
    pub fn with_session<R>(&self, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        f(&mut *lock(&self.session))
    }

    /// Send one user turn and wait for its reply.
    pub async fn send_message(&self, text: &str, context: &ChatContext) -> SendOutcome {
        let begun = lock(&self.session).begin_send(text, context);
        let request = match begun {
            Ok(request) => request,
            Err(reason) => return SendOutcome::Skipped(reason),
        };
        info!(turns = request.messages.len(), has_context = !context.is_empty(), "chat: sending");

        let guard = InFlight { session: &self.session, settled: false };
        let result = self.transport.send(&request).await;
        let outcome = match &result {
            Ok(_) => SendOutcome::Replied,
            Err(e) => {
                warn!(error = %e, error_code = e.error_code(), "chat: send failed");
                SendOutcome::Failed { error_code: e.error_code() }
            }
        };
        guard.settle(result);
        outcome
    }

    /// Feed one composer key press. Returns the send outcome when it submitted.
    pub async fn handle_key(&self, press: KeyPress, context: &ChatContext) -> Option<SendOutcome> {
        let submit_text = {
            let mut session = lock(&self.session);
            let action = input::classify(press);
            if !input::apply(action, session.input_mut()) {
                return None;
            }
            session.input().to_string()
        };
        Some(self.send_message(&submit_text, context).await)
    }
}

fn lock(session: &Mutex<ChatSession>) -> MutexGuard<'_, ChatSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settles the outstanding turn exactly once, even if the send is dropped.
struct InFlight<'a> {
    session: &'a Mutex<ChatSession>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, result: Result<ChatReply, ClientError>) {
        lock(self.session).settle(result);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("chat: send dropped before settling");
            lock(self.session).settle(Err(ClientError::Cancelled));
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
