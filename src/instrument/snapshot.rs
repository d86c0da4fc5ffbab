//! Per-request snapshots recorded by the instrumentation layer.

use axum::http::{header, HeaderMap, HeaderName, Request};
use serde::Serialize;

/// Placeholder logged for an unset URL configuration variable.
pub const MISSING: &str = "<missing>";

/// Placeholder logged when an error response body cannot be read.
pub const UNREADABLE: &str = "<unreadable>";

/// Base URL of the hosted auth backend. Also overrides `upstream.base_url`.
pub const ENV_BACKEND_URL: &str = "AUTHGATE_BACKEND_URL";
/// Public site URL as browsers see it.
pub const ENV_PUBLIC_SITE_URL: &str = "AUTHGATE_PUBLIC_SITE_URL";
pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_BETTER_AUTH_URL: &str = "BETTER_AUTH_URL";
/// Runtime mode. Logged raw, without a placeholder.
pub const ENV_MODE: &str = "AUTHGATE_ENV";

/// Every environment variable whose value ends up in the logs.
///
/// Values are written verbatim, so nothing secret-bearing may be added here.
pub const LOGGED_ENV_VARS: [&str; 5] = [
    ENV_BACKEND_URL,
    ENV_PUBLIC_SITE_URL,
    ENV_SITE_URL,
    ENV_BETTER_AUTH_URL,
    ENV_MODE,
];

/// Name fragments that mark a variable as secret-bearing.
const SECRET_MARKERS: [&str; 6] = ["SECRET", "TOKEN", "PASSWORD", "KEY", "CREDENTIAL", "PRIVATE"];

/// True when a variable name looks like it carries a secret.
pub fn is_secret_bearing(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    SECRET_MARKERS.iter().any(|m| upper.contains(m))
}

/// Configuration visible to the process at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvSnapshot {
    #[serde(rename = "AUTHGATE_BACKEND_URL")]
    pub backend_url: String,
    #[serde(rename = "AUTHGATE_PUBLIC_SITE_URL")]
    pub public_site_url: String,
    #[serde(rename = "SITE_URL")]
    pub site_url: String,
    #[serde(rename = "BETTER_AUTH_URL")]
    pub better_auth_url: String,
    #[serde(rename = "AUTHGATE_ENV", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl EnvSnapshot {
    /// Read the process environment.
    pub fn capture() -> Self {
        Self::capture_with(|key| {
            std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
        })
    }

    /// Build a snapshot from an arbitrary lookup.
    pub fn capture_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = |key: &str| lookup(key).unwrap_or_else(|| MISSING.to_string());
        Self {
            backend_url: url(ENV_BACKEND_URL),
            public_site_url: url(ENV_PUBLIC_SITE_URL),
            site_url: url(ENV_SITE_URL),
            better_auth_url: url(ENV_BETTER_AUTH_URL),
            mode: lookup(ENV_MODE),
        }
    }
}

/// What the layer knows about an inbound request before forwarding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub method: String,
    pub path: String,
    /// Query string with its leading `?`, empty when there is none.
    pub search: String,
    pub host: Option<String>,
    pub origin: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Social provider name, when the request names one.
    pub provider: Option<String>,
    pub env: EnvSnapshot,
}

impl RequestSnapshot {
    pub fn capture<B>(req: &Request<B>, env: EnvSnapshot) -> Self {
        let headers = req.headers();
        let query = req.uri().query().filter(|q| !q.is_empty());

        Self {
            request_id: header_string(headers, &REQUEST_ID),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            search: query.map(|q| format!("?{q}")).unwrap_or_default(),
            host: header_string(headers, &header::HOST),
            origin: header_string(headers, &header::ORIGIN),
            referer: header_string(headers, &header::REFERER),
            user_agent: header_string(headers, &header::USER_AGENT),
            provider: query.and_then(|q| query_param(q, "provider")),
            env,
        }
    }
}

/// Outcome of a request whose handler produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: u64,
    /// Body text of an error response; `None` for successes and empty bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Outcome of a request whose handler failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub method: String,
    pub path: String,
    pub duration_ms: u64,
    pub error: String,
}

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// First value of `name` in a URL-encoded query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
