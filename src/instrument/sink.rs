//! Destinations for auth route events.

use std::sync::Mutex;

use super::snapshot::{FailureOutcome, RequestSnapshot, ResponseOutcome};

/// Log target used for every auth route event.
pub const TARGET: &str = "authgate::auth_route";

/// Receives the three events the instrumentation layer produces.
///
/// Implementations must not fail; a sink that cannot deliver an event
/// drops it.
pub trait EventSink: Send + Sync + 'static {
    fn incoming(&self, snapshot: &RequestSnapshot);
    fn response(&self, outcome: &ResponseOutcome);
    fn error(&self, outcome: &FailureOutcome);
}

/// Emits events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn incoming(&self, s: &RequestSnapshot) {
        tracing::info!(
            target: TARGET,
            request_id = s.request_id.as_deref(),
            method = %s.method,
            pathname = %s.path,
            search = %s.search,
            host = s.host.as_deref(),
            origin = s.origin.as_deref(),
            referer = s.referer.as_deref(),
            user_agent = s.user_agent.as_deref(),
            provider = s.provider.as_deref(),
            env.backend_url = %s.env.backend_url,
            env.public_site_url = %s.env.public_site_url,
            env.site_url = %s.env.site_url,
            env.better_auth_url = %s.env.better_auth_url,
            env.mode = s.env.mode.as_deref(),
            "[auth route] incoming"
        );
    }

    fn response(&self, o: &ResponseOutcome) {
        tracing::info!(
            target: TARGET,
            request_id = o.request_id.as_deref(),
            method = %o.method,
            pathname = %o.path,
            status = o.status,
            duration_ms = o.duration_ms,
            body = o.body.as_deref(),
            "[auth route] response"
        );
    }

    fn error(&self, o: &FailureOutcome) {
        tracing::error!(
            target: TARGET,
            request_id = o.request_id.as_deref(),
            method = %o.method,
            pathname = %o.path,
            duration_ms = o.duration_ms,
            error = %o.error,
            "[auth route] error"
        );
    }
}

/// An event as delivered to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Incoming(RequestSnapshot),
    Response(ResponseOutcome),
    Error(FailureOutcome),
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AuthEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events recorded so far.
    pub fn events(&self) -> Vec<AuthEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: AuthEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl EventSink for RecordingSink {
    fn incoming(&self, snapshot: &RequestSnapshot) {
        self.push(AuthEvent::Incoming(snapshot.clone()));
    }

    fn response(&self, outcome: &ResponseOutcome) {
        self.push(AuthEvent::Response(outcome.clone()));
    }

    fn error(&self, outcome: &FailureOutcome) {
        self.push(AuthEvent::Error(outcome.clone()));
    }
}
