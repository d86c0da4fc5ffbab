//! Session and role lookups against the auth backend.
//!
//! The caller's cookie is replayed on each lookup. A lookup that fails is
//! reported as an unknown state rather than as "signed out": a failed
//! session lookup keeps the bar in its loading shape and a failed role
//! lookup leaves the admin flag `Unknown`.

use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use serde::Deserialize;
use url::Url;

use super::state::{AdminFlag, Session, SessionView};
use crate::config::{AuthRouteConfig, NavigationConfig, UpstreamConfig};
use crate::observability::metrics;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid lookup url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lookup returned status {0}")]
    Status(StatusCode),

    #[error("malformed lookup response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminCheck {
    is_admin: bool,
}

/// Resolves the caller's session and admin flag.
#[derive(Clone, Debug)]
pub struct SessionClient {
    client: reqwest::Client,
    session_url: Url,
    admin_url: Url,
}

impl SessionClient {
    pub fn new(
        upstream: &UpstreamConfig,
        auth_route: &AuthRouteConfig,
        navigation: &NavigationConfig,
    ) -> Result<Self, LookupError> {
        let base = Url::parse(&upstream.base_url)?;
        let session_url = join(&base, &format!("{}/get-session", auth_route.path_prefix));
        let admin_url = join(&base, &navigation.admin_check_path);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(navigation.lookup_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            session_url,
            admin_url,
        })
    }

    /// Current session, `None` when signed out.
    pub async fn session(
        &self,
        cookie: Option<&HeaderValue>,
    ) -> Result<Option<Session>, LookupError> {
        let text = self.lookup(&self.session_url, cookie).await?.text().await?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<Option<Session>>(text)?)
    }

    /// Whether the session behind `cookie` belongs to an admin.
    pub async fn is_admin(&self, cookie: Option<&HeaderValue>) -> Result<bool, LookupError> {
        let check: AdminCheck = self.lookup(&self.admin_url, cookie).await?.json().await?;
        Ok(check.is_admin)
    }

    /// Session view and admin flag for rendering the bar.
    pub async fn resolve(&self, cookie: Option<&HeaderValue>) -> (SessionView, AdminFlag) {
        let view = match self.session(cookie).await {
            Ok(Some(session)) => SessionView::signed_in(session),
            Ok(None) => SessionView::anonymous(),
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                metrics::record_nav_lookup("session", false);
                return (SessionView::pending(), AdminFlag::Unknown);
            }
        };
        metrics::record_nav_lookup("session", true);

        if view.session.is_none() {
            return (view, AdminFlag::No);
        }

        let admin = match self.is_admin(cookie).await {
            Ok(is_admin) => {
                metrics::record_nav_lookup("role", true);
                AdminFlag::from(is_admin)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Role lookup failed");
                metrics::record_nav_lookup("role", false);
                AdminFlag::Unknown
            }
        };
        (view, admin)
    }

    async fn lookup(
        &self,
        url: &Url,
        cookie: Option<&HeaderValue>,
    ) -> Result<reqwest::Response, LookupError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }
        Ok(response)
    }
}

fn join(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{path}"));
    url
}
