//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! collected so a bad file reports all of them at once.

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            if url.query().is_some() {
                errors.push(ValidationError::new(
                    "upstream.base_url",
                    "must not carry a query string",
                ));
            }
        }
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported url: {url}"),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("invalid url: {e}"),
        )),
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be > 0"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be > 0",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    let prefix = &config.auth_route.path_prefix;
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        errors.push(ValidationError::new(
            "auth_route.path_prefix",
            format!("must look like /segment, got {prefix:?}"),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }
    if config.observability.max_error_body_bytes == 0 {
        errors.push(ValidationError::new(
            "observability.max_error_body_bytes",
            "must be > 0",
        ));
    }

    for p in &config.navigation.auth_path_prefixes {
        if !p.starts_with('/') {
            errors.push(ValidationError::new(
                "navigation.auth_path_prefixes",
                format!("{p:?} must start with /"),
            ));
        }
    }
    if !config.navigation.admin_check_path.starts_with('/') {
        errors.push(ValidationError::new(
            "navigation.admin_check_path",
            "must start with /",
        ));
    }
    if config.navigation.lookup_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "navigation.lookup_timeout_secs",
            "must be > 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
