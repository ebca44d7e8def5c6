//! Appwrite CORS proxy library.
//!
//! A single-hop HTTP relay: every inbound request is forwarded to one
//! configured upstream, with the request target taken from the `path` query
//! parameter, and the answer is relayed back with permissive CORS headers.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
