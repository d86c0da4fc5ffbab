//! Instrumentation for the auth route.
//!
//! # Data Flow
//! ```text
//! request
//!     → snapshot.rs (method, path, query, allow-listed headers, env)
//!     → sink: incoming
//!     → inner handler
//!     → ok:  capture.rs (error bodies only) → sink: response
//!     → err: sink: error → same error returned
//! ```
//!
//! # Design Decisions
//! - Transparent: responses and errors leave exactly as the handler produced them
//! - Failures on the logging path become placeholders, never errors
//! - Only a fixed allow-list of headers and env variables is recorded

pub mod capture;
pub mod layer;
pub mod sink;
pub mod snapshot;

pub use layer::{InstrumentLayer, Instrumented};
pub use sink::{AuthEvent, EventSink, RecordingSink, TracingSink};
pub use snapshot::{
    EnvSnapshot, FailureOutcome, RequestSnapshot, ResponseOutcome, MISSING, UNREADABLE,
};
