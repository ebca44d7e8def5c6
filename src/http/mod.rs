//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, method dispatch, preflight)
//!     → request.rs (target path, header allow-list, body)
//!     → upstream.rs (one exchange with the upstream)
//!     → response.rs (relay status/content type/body, or JSON error)
//!     → Send to client (CORS headers added by the security layer)
//! ```

pub mod request;
pub mod request_id;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::{ForwardHeaders, OutboundRequest};
pub use request_id::{RequestIdExt, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamResponse, UpstreamTarget};
