//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Mount the instrumented forwarding handler on the auth route
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    response::{IntoResponse, Response},
    routing::{get, get_service},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{GatewayConfig, NavigationConfig};
use crate::http::handlers;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::instrument::{EventSink, InstrumentLayer, TracingSink};
use crate::lifecycle::signals;
use crate::navigation::{LookupError, SessionClient};
use crate::upstream::{AuthProxy, UpstreamError};

/// Failure while assembling the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("auth backend: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("session lookups: {0}")]
    Lookup(#[from] LookupError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionClient,
    pub navigation: Arc<NavigationConfig>,
}

/// HTTP server for the auth gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a server whose auth route logs through `tracing`.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a server whose auth route events go to `sink`.
    pub fn with_sink(config: GatewayConfig, sink: Arc<dyn EventSink>) -> Result<Self, ServerError> {
        let proxy = AuthProxy::new(&config.upstream)?;
        let sessions =
            SessionClient::new(&config.upstream, &config.auth_route, &config.navigation)?;

        let state = AppState {
            sessions,
            navigation: Arc::new(config.navigation.clone()),
        };

        let instrument = InstrumentLayer::new(sink)
            .with_max_body_bytes(config.observability.max_error_body_bytes);

        let router = Self::build_router(&config, state, proxy, instrument);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &GatewayConfig,
        state: AppState,
        proxy: AuthProxy,
        instrument: InstrumentLayer,
    ) -> Router {
        // Failures are turned into responses outside the instrumentation,
        // so the layer sees the handler's own error.
        let auth = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(upstream_failure))
            .layer(instrument)
            .service(proxy);
        let auth_path = format!("{}/{{*rest}}", config.auth_route.path_prefix);

        Router::new()
            .route(&auth_path, get_service(auth.clone()).post_service(auth))
            .route("/nav", get(handlers::nav_fragment))
            .route("/healthz", get(handlers::healthz))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The assembled router, for driving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl+C, SIGTERM or a message on `shutdown`, after in-flight
    /// requests finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            auth_route = %self.config.auth_route.path_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    () = signals::wait_for_signal() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn upstream_failure(err: UpstreamError) -> Response {
    err.into_response()
}
