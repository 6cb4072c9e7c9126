//! LLM: upstream AI gateway adapter.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables. [`GatewayClient`] is the
//! only provider: an OpenAI-compatible chat-completions endpoint that also
//! accepts a `context` extension field. Callers depend on the [`LlmChat`]
//! trait so handlers can be tested against mocks.

pub mod config;
pub mod gateway;
pub mod normalize;
pub mod types;

pub use gateway::GatewayClient;
pub use types::{LlmChat, LlmError};
