//! Forwarding handler for the auth route.
//!
//! # Responsibilities
//! - Rewrite `{path}?{query}` onto the backend base URL
//! - Strip hop-by-hop headers in both directions
//! - Ask for an uncompressed body so error bodies stay readable in logs
//! - Hand back redirects as-is (the browser follows them, not the gateway)

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Response, Uri};
use futures_util::future::BoxFuture;
use tower::Service;
use url::Url;

use super::error::UpstreamError;
use crate::config::UpstreamConfig;

/// Largest request body relayed to the backend.
const MAX_REQUEST_BODY: usize = 1024 * 1024;

static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

static X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// Relays requests to the hosted auth backend.
#[derive(Clone, Debug)]
pub struct AuthProxy {
    client: reqwest::Client,
    base: Arc<Url>,
}

impl AuthProxy {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidTarget(format!("{}: {e}", config.base_url)))?;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base: Arc::new(base),
        })
    }

    /// Backend URL for an inbound request URI.
    pub fn target_url(&self, uri: &Uri) -> Url {
        let mut url = (*self.base).clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{}", uri.path()));
        url.set_query(uri.query());
        url
    }

    /// Forward one request and return the backend's response.
    pub async fn forward(&self, req: Request<Body>) -> Result<Response<Body>, UpstreamError> {
        let (parts, body) = req.into_parts();
        let url = self.target_url(&parts.uri);
        let body = axum::body::to_bytes(body, MAX_REQUEST_BODY)
            .await
            .map_err(UpstreamError::RequestBody)?;

        let headers = outbound_headers(parts.headers);
        tracing::debug!(method = %parts.method, url = %url, "Forwarding to auth backend");

        let mut outbound = self.client.request(parts.method, url).headers(headers);
        if !body.is_empty() {
            outbound = outbound.body(body);
        }
        let upstream = outbound.send().await?;

        let status = upstream.status();
        let upstream_headers = upstream.headers().clone();

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        for (name, value) in &upstream_headers {
            if !is_hop_by_hop(name) {
                response.headers_mut().append(name.clone(), value.clone());
            }
        }
        Ok(response)
    }
}

impl Service<Request<Body>> for AuthProxy {
    type Response = Response<Body>;
    type Error = UpstreamError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();
        Box::pin(async move { this.forward(req).await })
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

fn outbound_headers(mut headers: HeaderMap) -> HeaderMap {
    let original_host = headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    if let Some(host) = original_host {
        headers.insert(X_FORWARDED_HOST.clone(), host);
    }
    headers
}
