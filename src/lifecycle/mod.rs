//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber's recv() completes → server drains
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown
//! ```
//!
//! # Design Decisions
//! - In-flight auth requests finish before the process exits
//! - Tests stop servers through `Shutdown` instead of signals

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
