//! Failures while forwarding to the auth backend.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream target: {0}")]
    InvalidTarget(String),

    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    #[error("upstream timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}

impl UpstreamError {
    /// Status returned to the client once the failure has been logged.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        // The detail stays in the logs.
        let message = match self {
            Self::InvalidTarget(_) => "Auth route misconfigured",
            Self::RequestBody(_) => "Unreadable request body",
            Self::Timeout => "Auth backend timed out",
            Self::Transport(_) => "Auth backend unreachable",
        };
        (self.status(), message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(UpstreamError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            UpstreamError::InvalidTarget("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_hides_detail() {
        let res = UpstreamError::InvalidTarget("secret-host".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
