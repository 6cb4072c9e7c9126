//! Domain services invoked by HTTP route handlers.

pub mod proxy;
