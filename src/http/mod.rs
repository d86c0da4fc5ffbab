//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → {prefix}/{*rest}: instrument layer → upstream forwarder
//!     → /nav: handlers.rs (session lookups → navigation fragment)
//!     → /healthz: handlers.rs
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, GatewayServer, ServerError};
