//! Proxy gateway behavior against an in-process upstream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use storefront_gateway::GatewayConfig;

mod common;
use common::{body_bytes, body_json, post_apply, router_with, send, RecordingUpstream, Reply};

#[tokio::test]
async fn test_missing_fields_rejected_without_upstream_call() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, r#"{"status":"ok"}"#));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(&router, post_apply("{}", &[])).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await,
        json!({ "error": "Missing required fields: product_id, new_price" })
    );
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_one_missing_field_is_named() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(&router, post_apply(r#"{"product_id":"sku-1"}"#, &[])).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Missing required fields: new_price");
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_success_body_is_forwarded_verbatim() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, r#"{"status":"ok"}"#));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(
        &router,
        post_apply(r#"{"product_id":"sku-42","new_price":19.99}"#, &[]),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(&body_bytes(res).await[..], br#"{"status":"ok"}"#);
    assert_eq!(upstream.calls(), 1);

    let request = upstream.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.url.as_str(),
        "http://localhost:8000/recommendations/apply/sku-42"
    );
    let sent: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(
        sent,
        json!({ "product_id": "sku-42", "new_price": 19.99, "apply_to_shopify": true })
    );
}

#[tokio::test]
async fn test_upstream_failure_status_and_detail_are_relayed() {
    let upstream = RecordingUpstream::new(Reply::Respond(422, r#"{"detail":"invalid price"}"#));
    let router = router_with(GatewayConfig::default(), upstream);

    let res = send(&router, post_apply(r#"{"product_id":1,"new_price":-5}"#, &[])).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(res).await, json!({ "error": "invalid price" }));
}

#[tokio::test]
async fn test_unparseable_upstream_error_gets_generic_message() {
    let upstream = RecordingUpstream::new(Reply::Respond(503, "<html>down</html>"));
    let router = router_with(GatewayConfig::default(), upstream);

    let res = send(&router, post_apply(r#"{"product_id":1,"new_price":5}"#, &[])).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(res).await, json!({ "error": "Unknown error" }));
}

#[tokio::test]
async fn test_malformed_body_is_internal_error() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(&router, post_apply("{not json", &[])).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await, json!({ "error": "Internal server error" }));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_timeout_is_internal_error() {
    let mut config = GatewayConfig::default();
    config.upstream.timeout_secs = 1;
    let upstream = RecordingUpstream::new(Reply::Hang);
    let router = router_with(config, upstream.clone());

    let res = send(&router, post_apply(r#"{"product_id":1,"new_price":5}"#, &[])).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await, json!({ "error": "Internal server error" }));
    assert_eq!(upstream.calls(), 1);
}

/// Counts error events emitted by this crate.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::ERROR && meta.target().starts_with("storefront_gateway") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn test_transport_failure_is_logged_once() {
    let errors = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
    let _guard = tracing::subscriber::set_default(subscriber);

    let upstream = RecordingUpstream::new(Reply::Fail);
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(&router, post_apply(r#"{"product_id":1,"new_price":5}"#, &[])).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
    assert!(!body.to_string().contains("connection refused"));
    assert_eq!(upstream.calls(), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_cookie_beats_header() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    send(
        &router,
        post_apply(
            r#"{"product_id":1,"new_price":5}"#,
            &[("cookie", "session_id=cookie-token"), ("x-session-id", "header-token")],
        ),
    )
    .await;

    let request = upstream.last_request().unwrap();
    assert_eq!(request.headers["x-session-id"], "cookie-token");
}

#[tokio::test]
async fn test_session_header_used_without_cookie() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    send(
        &router,
        post_apply(r#"{"product_id":1,"new_price":5}"#, &[("x-session-id", "header-token")]),
    )
    .await;

    assert_eq!(upstream.last_request().unwrap().headers["x-session-id"], "header-token");
}

#[tokio::test]
async fn test_generated_session_is_attached_but_not_set_on_client() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(&router, post_apply(r#"{"product_id":1,"new_price":5}"#, &[])).await;

    assert!(res.headers().get("set-cookie").is_none());
    let request = upstream.last_request().unwrap();
    let session = request.headers["x-session-id"].to_str().unwrap();
    assert!(session.starts_with("session_"));
    assert!(session.len() > "session_".len());
}

#[tokio::test]
async fn test_request_id_is_forwarded_and_echoed() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let res = send(
        &router,
        post_apply(r#"{"product_id":1,"new_price":5}"#, &[("x-request-id", "req-123")]),
    )
    .await;

    assert_eq!(res.headers()["x-request-id"], "req-123");
    assert_eq!(upstream.last_request().unwrap().headers["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_recommendation_lookup_is_proxied() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, r#"{"recommended_price":12.5}"#));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let req = axum::http::Request::builder()
        .uri("/api/recommendations/sku-7")
        .header("x-session-id", "abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&router, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(&body_bytes(res).await[..], br#"{"recommended_price":12.5}"#);

    let request = upstream.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url.as_str(), "http://localhost:8000/recommendations/sku-7");
    assert!(request.body.is_none());
    assert_eq!(request.headers["x-session-id"], "abc");
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(GatewayConfig::default(), upstream.clone());

    let req = axum::http::Request::builder()
        .uri("/api/nope")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&router, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await, json!({ "error": "Not found" }));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let mut config = GatewayConfig::default();
    config.security.max_body_size = 1024;
    let upstream = RecordingUpstream::new(Reply::Respond(200, "{}"));
    let router = router_with(config, upstream.clone());

    let big = format!(r#"{{"product_id":"{}","new_price":5}}"#, "x".repeat(4096));

    // Streamed body, rejected while buffering.
    let res = send(&router, post_apply(&big, &[])).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(res).await, json!({ "error": "Request body too large" }));

    // Declared length, rejected before the handler runs.
    let length = big.len().to_string();
    let res = send(&router, post_apply(&big, &[("content-length", length.as_str())])).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(res).await, json!({ "error": "Request body too large" }));

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_upstream_413_message_is_kept() {
    let upstream = RecordingUpstream::new(Reply::Respond(413, r#"{"detail":"batch too large"}"#));
    let router = router_with(GatewayConfig::default(), upstream);

    let res = send(&router, post_apply(r#"{"product_id":1,"new_price":5}"#, &[])).await;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(res).await, json!({ "error": "batch too large" }));
}
