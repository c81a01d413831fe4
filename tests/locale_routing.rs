//! Locale router behavior through the full middleware stack.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use storefront_gateway::GatewayConfig;

mod common;
use common::{body_json, router_with, send, RecordingUpstream, Reply};

fn get(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

fn router() -> axum::Router {
    router_with(
        GatewayConfig::default(),
        RecordingUpstream::new(Reply::Respond(200, "{}")),
    )
}

#[tokio::test]
async fn test_root_redirects_to_marketing_regardless_of_locale() {
    let router = router();

    for headers in [
        vec![],
        vec![("cookie", "preferred_locale=fr")],
        vec![("accept-language", "de-DE")],
    ] {
        let res = send(&router, get("/", &headers)).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()["location"], "/landing");
    }
}

#[tokio::test]
async fn test_excluded_routes_pass_through_untouched() {
    let router = router();

    for path in ["/dashboard", "/dashboard/products?sort=asc", "/landing", "/admin/users"] {
        let res = send(&router, get(path, &[("cookie", "preferred_locale=fr")])).await;
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        assert!(res.headers().get("location").is_none());

        let body = body_json(res).await;
        assert_eq!(body["class"], "excluded_direct");
        assert_eq!(body["locale"], serde_json::Value::Null);
    }
}

#[tokio::test]
async fn test_prefixed_path_is_served_without_redirect() {
    let res = send(&router(), get("/de/products", &[("accept-language", "en")])).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await,
        json!({ "path": "/de/products", "class": "locale_prefixed", "locale": "de" })
    );
}

#[tokio::test]
async fn test_unprefixed_path_redirects_to_negotiated_locale() {
    let router = router();

    let res = send(&router, get("/products?page=2", &[])).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/en/products?page=2");

    let res = send(&router, get("/products", &[("accept-language", "de-CH,de;q=0.9,en;q=0.5")])).await;
    assert_eq!(res.headers()["location"], "/de/products");

    let res = send(
        &router,
        get("/products", &[("accept-language", "de"), ("cookie", "preferred_locale=en")]),
    )
    .await;
    assert_eq!(res.headers()["location"], "/en/products");
}

#[tokio::test]
async fn test_unsupported_preference_is_not_found() {
    let res = send(&router(), get("/products", &[("cookie", "preferred_locale=fr")])).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_routes_skip_locale_routing() {
    let res = send(&router(), get("/api/health", &[("cookie", "preferred_locale=fr")])).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "ok");
}

#[tokio::test]
async fn test_configured_default_locale() {
    let mut config = GatewayConfig::default();
    config.locale.default_locale = storefront_gateway::locale::Locale::De;
    let router = router_with(config, RecordingUpstream::new(Reply::Respond(200, "{}")));

    let res = send(&router, get("/cart", &[])).await;
    assert_eq!(res.headers()["location"], "/de/cart");
}

#[tokio::test]
async fn test_reload_changes_excluded_prefixes() {
    let server = storefront_gateway::HttpServer::with_upstream(
        GatewayConfig::default(),
        RecordingUpstream::new(Reply::Respond(200, "{}")),
    );
    let router = server.router();

    let res = send(&router, get("/reports", &[])).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    let mut config = GatewayConfig::default();
    config.routing.excluded_prefixes.push("/reports".into());
    server.state().reload(config);

    let res = send(&router, get("/reports", &[])).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_language_switch_swaps_segment_and_persists_choice() {
    let res = send(&router(), get("/api/locale/switch?to=en&path=/de/products", &[])).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/en/products");
    let cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("preferred_locale=en"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_language_switch_falls_back_to_root() {
    let res = send(
        &router(),
        get("/api/locale/switch?to=en&path=/xx/unknown&active=de", &[]),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/en");
}

#[tokio::test]
async fn test_language_switch_rejects_foreign_redirects() {
    let res = send(&router(), get("/api/locale/switch?to=de&path=//evil.example/x", &[])).await;
    assert_eq!(res.headers()["location"], "/de");
}

#[tokio::test]
async fn test_language_switch_unsupported_target() {
    let res = send(&router(), get("/api/locale/switch?to=fr&path=/de/products", &[])).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get("set-cookie").is_none());
}

#[tokio::test]
async fn test_language_switch_rejects_control_characters() {
    let res = send(&router(), get("/api/locale/switch?to=en&path=/de/a%0Ab", &[])).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/en");
}
