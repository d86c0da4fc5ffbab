//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the auth gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Hosted auth backend that `/api/auth/*` is forwarded to.
    pub upstream: UpstreamConfig,

    /// Mount point of the instrumented auth route.
    pub auth_route: AuthRouteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Navigation fragment settings.
    pub navigation: NavigationConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Auth backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the hosted auth backend (e.g., "https://auth.example.site").
    pub base_url: String,

    /// Total time allowed for one forwarded request, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3211".to_string(),
            timeout_secs: 15,
            connect_timeout_secs: 5,
        }
    }
}

/// Where the auth route is mounted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthRouteConfig {
    /// Path prefix served by the forwarding handler.
    pub path_prefix: String,
}

impl Default for AuthRouteConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/api/auth".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Largest error response body captured into the response log entry.
    pub max_error_body_bytes: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            max_error_body_bytes: 64 * 1024,
        }
    }
}

/// Navigation fragment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Brand text shown in the home link.
    pub brand: String,

    pub home_href: String,
    pub admin_href: String,
    pub login_href: String,

    /// Pages on which the login link is never shown (prefix match).
    pub auth_path_prefixes: Vec<String>,

    /// Backend path answering `{"isAdmin": bool}` for the caller's session.
    pub admin_check_path: String,

    /// Timeout for each session/role lookup, in seconds.
    pub lookup_timeout_secs: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            brand: "BancStack".to_string(),
            home_href: "/".to_string(),
            admin_href: "/admin".to_string(),
            login_href: "/login".to_string(),
            auth_path_prefixes: vec!["/login".to_string(), "/signup".to_string()],
            admin_check_path: "/api/auth/admin/is-admin".to_string(),
            lookup_timeout_secs: 3,
        }
    }
}
