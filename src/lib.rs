//! Auth gateway library.
//!
//! Forwards the auth route to the auth backend with request/response
//! instrumentation, and serves a session-aware navigation fragment.

pub mod config;
pub mod http;
pub mod instrument;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
