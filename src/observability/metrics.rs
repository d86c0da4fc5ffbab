//! Metrics collection and exposition.
//!
//! # Metrics
//! - `authgate_auth_requests_total` (counter): auth route requests by method, outcome
//! - `authgate_auth_request_duration_seconds` (histogram): auth route latency
//! - `authgate_nav_lookups_total` (counter): session/role lookups by kind, result
//!
//! Outcome labels are status classes (`2xx`, `4xx`, ...) or `error` when the
//! handler failed, which keeps label cardinality fixed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Map a status code to its class label.
pub fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Record a completed auth route request.
pub fn record_auth_request(method: &str, outcome: &'static str, elapsed: Duration) {
    counter!("authgate_auth_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!("authgate_auth_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .record(elapsed.as_secs_f64());
}

/// Record a navigation lookup against the auth backend.
pub fn record_nav_lookup(kind: &'static str, ok: bool) {
    counter!("authgate_nav_lookups_total",
        "kind" => kind,
        "result" => if ok { "ok" } else { "failed" }
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(302), "3xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(99), "other");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_auth_request("GET", "2xx", Duration::from_millis(3));
        record_nav_lookup("session", false);
    }
}
