//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Handler / framework response
//!     → headers.rs (stamp CORS headers)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Cross-origin access is fully open (`*`); the proxy exists so browser
//!   clients on other origins can reach the upstream
//! - Authentication is the upstream's job; the proxy only forwards the
//!   project and key headers

pub mod headers;

pub use headers::{cors_headers, cors_layer, CorsLayer};
