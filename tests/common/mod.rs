//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

use storefront_gateway::gateway::{GatewayError, PricingUpstream, UpstreamRequest, UpstreamResponse};
use storefront_gateway::{GatewayConfig, HttpServer, Shutdown};

/// How the recording upstream answers.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(u16, &'static str),
    Fail,
    Hang,
}

/// In-process upstream that records every call.
pub struct RecordingUpstream {
    reply: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<UpstreamRequest>>,
}

#[allow(dead_code)]
impl RecordingUpstream {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PricingUpstream for RecordingUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        match &self.reply {
            Reply::Respond(status, body) => Ok(UpstreamResponse {
                status: StatusCode::from_u16(*status).unwrap(),
                body: Bytes::from_static(body.as_bytes()),
            }),
            Reply::Fail => Err(GatewayError::Transport("connection refused".into())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hung upstream call should have timed out")
            }
        }
    }
}

/// Router wired to a recording upstream.
#[allow(dead_code)]
pub fn router_with(config: GatewayConfig, upstream: Arc<RecordingUpstream>) -> Router {
    HttpServer::with_upstream(config, upstream).router()
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// `POST /api/recommendations/apply` with extra headers.
#[allow(dead_code)]
pub fn post_apply(body: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/recommendations/apply")
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Start a real gateway on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, signal).await;
    });

    (addr, shutdown)
}
