pub mod client;
pub mod llm;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
