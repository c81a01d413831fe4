//! Upstream pricing service client.
//!
//! # Responsibilities
//! - Build upstream URLs under the configured base
//! - Send exactly one request per call (no retries)
//! - Normalize responses into success or failure with a readable message

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use url::Url;

use crate::gateway::error::GatewayError;

/// Upper bound on buffered upstream response bodies.
pub const MAX_UPSTREAM_BODY: usize = 4 * 1024 * 1024;

/// Substituted when an upstream failure body carries no readable message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// One outbound call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Raw upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Seam between the gateway handlers and the network.
#[async_trait]
pub trait PricingUpstream: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, GatewayError>;
}

/// HTTP/1.1 client for the pricing service.
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client<HttpConnector, Body>,
}

impl HttpUpstream {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }
}

impl Default for HttpUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PricingUpstream for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, GatewayError> {
        let uri: Uri = request
            .url
            .as_str()
            .parse()
            .map_err(|e| GatewayError::Internal(format!("invalid upstream URI: {}", e)))?;

        let mut builder = Request::builder().method(request.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(request.headers);
        }
        let req = builder
            .body(request.body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| GatewayError::Internal(format!("failed to build upstream request: {}", e)))?;

        let response = self
            .client
            .request(req)
            .await
            .map_err(|e| GatewayError::Transport(Box::new(e)))?;

        read_response(response).await
    }
}

async fn read_response(response: Response<Incoming>) -> Result<UpstreamResponse, GatewayError> {
    let status = response.status();
    let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_UPSTREAM_BODY)
        .await
        .map_err(|e| GatewayError::UpstreamBody(e.to_string()))?;
    Ok(UpstreamResponse { status, body })
}

/// `base` joined with `segments`, each percent-encoded as one path segment.
pub fn upstream_url(base: &str, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = Url::parse(base)
        .map_err(|e| GatewayError::Internal(format!("invalid upstream base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| GatewayError::Internal("upstream base URL cannot be a base".into()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Normalized upstream outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResult {
    /// 2xx; body is passed through untouched.
    Success { status: StatusCode, body: Bytes },
    Failure { status: StatusCode, message: String },
}

impl From<UpstreamResponse> for UpstreamResult {
    fn from(response: UpstreamResponse) -> Self {
        if response.status.is_success() {
            Self::Success {
                status: response.status,
                body: response.body,
            }
        } else {
            Self::Failure {
                status: response.status,
                message: error_message(&response.body),
            }
        }
    }
}

impl IntoResponse for UpstreamResult {
    fn into_response(self) -> Response {
        match self {
            Self::Success { status, body } => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                body,
            )
                .into_response(),
            Self::Failure { status, message } => {
                GatewayError::Upstream { status, message }.into_response()
            }
        }
    }
}

/// Human-readable message from an upstream error body.
///
/// Looks at `detail` (a string, or a validation list whose first entry has
/// `msg`), then `error`, then `message`.
pub fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return UNKNOWN_ERROR_MESSAGE.to_string();
    };

    let detail = match value.get("detail") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str),
        _ => None,
    };

    let usable = |m: &&str| !m.trim().is_empty();
    detail
        .filter(usable)
        .or_else(|| value.get("error").and_then(Value::as_str).filter(usable))
        .or_else(|| value.get("message").and_then(Value::as_str).filter(usable))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}
