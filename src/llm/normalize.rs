//! Gateway response normalization.
//!
//! The gateway answers in one of two shapes:
//!
//! - its own: `{ "message": "...", "session_id": "..." }`
//! - conventional completion: `{ "id": "...", "choices": [{ "message": { "content": "..." } }] }`
//!
//! Each extracted field walks an ordered list of candidate paths and takes
//! the first non-empty string. Empty strings count as absent.

use serde_json::Value;

use crate::protocol::ChatReply;

/// Reply text used when no candidate path yields text.
pub const PLACEHOLDER_REPLY: &str = "Sorry, I couldn't generate a response.";

type Extractor = fn(&Value) -> Option<&str>;

const REPLY_PATHS: &[Extractor] = &[top_level_message, first_choice_content];
const SESSION_PATHS: &[Extractor] = &[top_level_session_id, completion_id];

/// Normalize a raw gateway document into the client-facing reply.
#[must_use]
pub fn normalize_completion(root: &Value) -> ChatReply {
    ChatReply { message: extract_reply_text(root), session_id: extract_session_id(root) }
}

/// `message` → `choices[0].message.content` → [`PLACEHOLDER_REPLY`].
#[must_use]
pub fn extract_reply_text(root: &Value) -> String {
    first_match(root, REPLY_PATHS).map_or_else(|| PLACEHOLDER_REPLY.to_string(), str::to_owned)
}

/// `session_id` → `id` → empty string.
#[must_use]
pub fn extract_session_id(root: &Value) -> String {
    first_match(root, SESSION_PATHS).map(str::to_owned).unwrap_or_default()
}

fn first_match<'a>(root: &'a Value, paths: &[Extractor]) -> Option<&'a str> {
    paths
        .iter()
        .find_map(|extract| extract(root).filter(|s| !s.is_empty()))
}

fn top_level_message(root: &Value) -> Option<&str> {
    root.get("message").and_then(Value::as_str)
}

fn first_choice_content(root: &Value) -> Option<&str> {
    root.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
}

fn top_level_session_id(root: &Value) -> Option<&str> {
    root.get("session_id").and_then(Value::as_str)
}

fn completion_id(root: &Value) -> Option<&str> {
    root.get("id").and_then(Value::as_str)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
