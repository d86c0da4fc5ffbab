use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::http::server::AppState;
use crate::navigation::{render_html, NavBar};

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    /// Page the fragment will be embedded in.
    pub path: Option<String>,
}

/// `GET /nav`: navigation fragment for the caller's session.
pub async fn nav_fragment(
    State(state): State<AppState>,
    Query(query): Query<NavQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let path = query.path.as_deref().unwrap_or("/");
    let cookie = joined_cookie(&headers);
    let (view, admin) = state.sessions.resolve(cookie.as_ref()).await;

    tracing::debug!(
        path = %path,
        signed_in = view.session.is_some(),
        pending = view.is_pending,
        admin = ?admin,
        "Rendering navigation"
    );

    let bar = NavBar::build(
        Some(path),
        &view,
        admin,
        &state.navigation.auth_path_prefixes,
    );

    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        render_html(&bar, &state.navigation),
    )
}

/// All `Cookie` headers folded into one, as HTTP/2 clients may split them.
fn joined_cookie(headers: &HeaderMap) -> Option<HeaderValue> {
    let mut values = headers.get_all(header::COOKIE).iter();
    let first = values.next()?;
    let mut joined = first.as_bytes().to_vec();
    for value in values {
        joined.extend_from_slice(b"; ");
        joined.extend_from_slice(value.as_bytes());
    }
    HeaderValue::from_bytes(&joined).ok()
}

/// `GET /healthz`
pub async fn healthz() -> &'static str {
    "ok"
}
