//! Gateway HTTP handlers.

use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};

use crate::config::GatewayConfig;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::ApplyPricePayload;
use crate::gateway::session::SessionIdentity;
use crate::gateway::upstream::{upstream_url, UpstreamRequest, UpstreamResult};
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::state::AppState;
use crate::observability::metrics;

/// `POST /api/recommendations/apply`
pub async fn apply_price(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let response = match forward_apply(&state, &jar, &headers, &body).await {
        Ok(result) => result.into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_gateway_request("apply_price", response.status().as_u16(), start);
    response
}

async fn forward_apply(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<UpstreamResult, GatewayError> {
    let value: Value = serde_json::from_slice(body).map_err(GatewayError::MalformedBody)?;
    let payload = ApplyPricePayload::from_json(&value)?;

    let runtime = state.runtime.load_full();
    let config = &runtime.config;
    let session = SessionIdentity::derive(jar, headers, &config.session);

    let product_id = payload.product_id.to_string();
    let url = upstream_url(
        &config.upstream.base_url,
        &["recommendations", "apply", product_id.as_str()],
    )?;
    let upstream_body = serde_json::to_vec(&payload.upstream_body())
        .map_err(|e| GatewayError::Internal(format!("failed to encode upstream body: {}", e)))?;

    tracing::info!(
        request_id = request_id(headers).unwrap_or("unknown"),
        product_id = %product_id,
        session_source = session.source().as_str(),
        "Forwarding price application"
    );

    let mut upstream_headers = upstream_headers(headers, &session, config)?;
    upstream_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let request = UpstreamRequest {
        method: Method::POST,
        url,
        headers: upstream_headers,
        body: Some(Bytes::from(upstream_body)),
    };
    call_upstream(state, config, request, "apply_price").await
}

/// `GET /api/recommendations/{product_id}`
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let response = match forward_recommendation(&state, &product_id, &jar, &headers).await {
        Ok(result) => result.into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_gateway_request("get_recommendation", response.status().as_u16(), start);
    response
}

async fn forward_recommendation(
    state: &AppState,
    product_id: &str,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<UpstreamResult, GatewayError> {
    if product_id.trim().is_empty() {
        return Err(GatewayError::MissingFields(vec!["product_id"]));
    }

    let runtime = state.runtime.load_full();
    let config = &runtime.config;
    let session = SessionIdentity::derive(jar, headers, &config.session);
    let url = upstream_url(&config.upstream.base_url, &["recommendations", product_id])?;

    let request = UpstreamRequest {
        method: Method::GET,
        url,
        headers: upstream_headers(headers, &session, config)?,
        body: None,
    };
    call_upstream(state, config, request, "get_recommendation").await
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Session and correlation headers shared by every upstream call.
fn upstream_headers(
    inbound: &HeaderMap,
    session: &SessionIdentity,
    config: &GatewayConfig,
) -> Result<HeaderMap, GatewayError> {
    let session_header = HeaderName::from_bytes(config.session.header_name.as_bytes())
        .map_err(|e| GatewayError::Internal(format!("invalid session header name: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(session_header, session.header_value());
    if let Some(id) = inbound.get(X_REQUEST_ID) {
        headers.insert(X_REQUEST_ID, id.clone());
    }
    Ok(headers)
}

async fn call_upstream(
    state: &AppState,
    config: &GatewayConfig,
    request: UpstreamRequest,
    action: &'static str,
) -> Result<UpstreamResult, GatewayError> {
    let timeout = Duration::from_secs(config.upstream.timeout_secs);
    let start = Instant::now();
    let outcome = tokio::time::timeout(timeout, state.upstream.send(request)).await;
    metrics::record_upstream_duration(action, start);

    let response = outcome.map_err(|_| GatewayError::Timeout(timeout))??;
    tracing::debug!(action, status = %response.status, "Upstream responded");
    Ok(UpstreamResult::from(response))
}
