//! The hosted auth backend, seen as a request handler.
//!
//! # Data Flow
//! ```text
//! /api/auth/* request
//!     → proxy.rs (rewrite onto backend base URL, relay)
//!     → backend response streamed back unchanged
//!     → error.rs on failure (mapped to 4xx/5xx outside the instrumentation)
//! ```

pub mod error;
pub mod proxy;

pub use error::UpstreamError;
pub use proxy::AuthProxy;
