//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → listener.rs (bind 0.0.0.0:<port>)
//!     → Hand off to HTTP layer (axum accept loop, one task per connection)
//! ```
//!
//! # Design Decisions
//! - A bind failure is fatal; nothing is served without a socket
//! - A connection that sends garbage only affects itself

pub mod listener;

pub use listener::{bind, ListenerError};
