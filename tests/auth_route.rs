//! End-to-end tests for the instrumented auth route.

mod common;

use std::sync::{Arc, Mutex};

use authgate::instrument::{AuthEvent, RecordingSink};
use authgate::GatewayConfig;
use common::{
    client, start_gateway, start_gateway_with, start_programmable_backend, MockResponse,
    RecordedRequest,
};

#[tokio::test]
async fn test_get_forwarded_with_query() {
    let seen: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
    let seen_backend = seen.clone();
    let backend = start_programmable_backend(move |req| {
        seen_backend.lock().unwrap().push(req);
        async { MockResponse::json(200, r#"{"ok":true}"#) }
    })
    .await;

    let sink = Arc::new(RecordingSink::new());
    let (gateway, shutdown) = start_gateway(backend, sink.clone()).await;

    let res = client()
        .get(format!("http://{gateway}/api/auth/callback/google?code=abc&state=xyz"))
        .header("cookie", "better-auth.session=1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), r#"{"ok":true}"#);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].target, "/api/auth/callback/google?code=abc&state=xyz");
    assert_eq!(seen[0].header("cookie"), Some("better-auth.session=1"));
    assert_eq!(seen[0].header("x-forwarded-host"), Some(gateway.to_string().as_str()));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    let AuthEvent::Incoming(incoming) = &events[0] else {
        panic!("expected incoming, got {:?}", events[0]);
    };
    assert_eq!(incoming.path, "/api/auth/callback/google");
    assert_eq!(incoming.search, "?code=abc&state=xyz");
    let AuthEvent::Response(outcome) = &events[1] else {
        panic!("expected response, got {:?}", events[1]);
    };
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.body, None);
    assert_eq!(outcome.request_id, incoming.request_id);

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_body_forwarded() {
    let backend = start_programmable_backend(|req| async move {
        let echoed = format!(
            "{}|{}|{}",
            req.method,
            req.header("content-type").unwrap_or_default(),
            req.body
        );
        MockResponse::new(200, echoed)
    })
    .await;

    let (gateway, shutdown) = start_gateway(backend, Arc::new(RecordingSink::new())).await;

    let res = client()
        .post(format!("http://{gateway}/api/auth/sign-in/email"))
        .header("content-type", "application/json")
        .body(r#"{"email":"a@b.c","password":"pw"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.text().await.unwrap(),
        r#"POST|application/json|{"email":"a@b.c","password":"pw"}"#
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_error_body_logged_and_passed_through() {
    let body = r#"{"code":"INVALID_EMAIL_OR_PASSWORD","message":"Invalid email or password"}"#;
    let backend =
        start_programmable_backend(move |_| async move { MockResponse::json(401, body) }).await;

    let sink = Arc::new(RecordingSink::new());
    let (gateway, shutdown) = start_gateway(backend, sink.clone()).await;

    let res = client()
        .post(format!("http://{gateway}/api/auth/sign-in/email"))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), body);

    let events = sink.events();
    let AuthEvent::Response(outcome) = &events[1] else {
        panic!("expected response, got {:?}", events[1]);
    };
    assert_eq!(outcome.status, 401);
    assert_eq!(outcome.body.as_deref(), Some(body));

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_error_body_still_forwarded() {
    let body = "x".repeat(2048);
    let expected = body.clone();
    let backend = start_programmable_backend(move |_| {
        let body = body.clone();
        async move { MockResponse::new(500, body) }
    })
    .await;

    let mut config = GatewayConfig::default();
    config.upstream.base_url = format!("http://{backend}");
    config.observability.max_error_body_bytes = 1024;

    let sink = Arc::new(RecordingSink::new());
    let (gateway, shutdown) = start_gateway_with(config, sink.clone()).await;

    let res = client()
        .get(format!("http://{gateway}/api/auth/get-session"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), expected);

    let events = sink.events();
    let AuthEvent::Response(outcome) = &events[1] else {
        panic!("expected response, got {:?}", events[1]);
    };
    assert_eq!(outcome.body.as_deref(), Some(authgate::instrument::UNREADABLE));

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirects_and_cookies_returned_to_client() {
    let backend = start_programmable_backend(|_| async {
        MockResponse::new(302, "")
            .with_header("location", "https://accounts.google.com/o/oauth2/auth?client_id=x")
            .with_header("set-cookie", "state=abc; Path=/; HttpOnly")
            .with_header("set-cookie", "pkce=def; Path=/; HttpOnly")
    })
    .await;

    let (gateway, shutdown) = start_gateway(backend, Arc::new(RecordingSink::new())).await;

    let res = client()
        .get(format!("http://{gateway}/api/auth/sign-in/social?provider=google"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(
        res.headers()["location"],
        "https://accounts.google.com/o/oauth2/auth?client_id=x"
    );
    let cookies: Vec<_> = res.headers().get_all("set-cookie").iter().collect();
    assert_eq!(cookies.len(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    // Bind then drop to get a port with nothing behind it.
    let dead = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let sink = Arc::new(RecordingSink::new());
    let (gateway, shutdown) = start_gateway(dead, sink.clone()).await;

    let res = client()
        .get(format!("http://{gateway}/api/auth/get-session"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], AuthEvent::Error(_)));

    shutdown.trigger();
}
