//! Tower layer that observes an auth handler without changing it.

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use super::capture::duplicate_body_text;
use super::sink::{EventSink, TracingSink};
use super::snapshot::{EnvSnapshot, FailureOutcome, RequestSnapshot, ResponseOutcome};
use crate::observability::metrics;

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Wraps a handler with incoming/response/error events.
#[derive(Clone)]
pub struct InstrumentLayer {
    sink: Arc<dyn EventSink>,
    env_lookup: Option<EnvLookup>,
    max_body_bytes: usize,
}

impl InstrumentLayer {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            env_lookup: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Layer logging through `tracing`.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Largest error body read into the response event.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Replace the process environment as the source of the env snapshot.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Some(Arc::new(lookup));
        self
    }
}

impl fmt::Debug for InstrumentLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentLayer")
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for InstrumentLayer {
    type Service = Instrumented<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Instrumented {
            inner,
            layer: self.clone(),
        }
    }
}

/// A handler wrapped by [`InstrumentLayer`].
///
/// Same request, response and error types as the inner service.
#[derive(Clone, Debug)]
pub struct Instrumented<S> {
    inner: S,
    layer: InstrumentLayer,
}

impl<S> Instrumented<S> {
    fn env_snapshot(&self) -> EnvSnapshot {
        match &self.layer.env_lookup {
            Some(lookup) => EnvSnapshot::capture_with(|k| (**lookup)(k)),
            None => EnvSnapshot::capture(),
        }
    }
}

impl<S, ReqBody> Service<Request<ReqBody>> for Instrumented<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: fmt::Display + Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let snapshot = RequestSnapshot::capture(&req, self.env_snapshot());
        let sink = self.layer.sink.clone();
        let max_body_bytes = self.layer.max_body_bytes;

        sink.incoming(&snapshot);
        let RequestSnapshot {
            request_id,
            method,
            path,
            ..
        } = snapshot;

        // The clone may not be ready; keep the instance poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let pending = inner.call(req);

        Box::pin(async move {
            match pending.await {
                Ok(res) => {
                    let elapsed = start.elapsed();
                    let status = res.status().as_u16();
                    let (res, body) = if status >= 400 {
                        let (parts, body) = res.into_parts();
                        let (body, text) = duplicate_body_text(body, max_body_bytes).await;
                        (Response::from_parts(parts, body), text)
                    } else {
                        (res, None)
                    };

                    metrics::record_auth_request(&method, metrics::status_class(status), elapsed);
                    sink.response(&ResponseOutcome {
                        request_id,
                        method,
                        path,
                        status,
                        duration_ms: millis(elapsed),
                        body,
                    });
                    Ok(res)
                }
                Err(err) => {
                    let elapsed = start.elapsed();
                    metrics::record_auth_request(&method, "error", elapsed);
                    sink.error(&FailureOutcome {
                        request_id,
                        method,
                        path,
                        duration_ms: millis(elapsed),
                        error: err.to_string(),
                    });
                    Err(err)
                }
            }
        })
    }
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
