//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, limits, timeouts)
//! - Keep `/api` outside the locale routing layer
//! - Apply configuration reloads
//! - Serve until the shutdown signal, then drain

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gateway::error::GatewayError;
use crate::gateway::handlers::{apply_price, get_recommendation, health};
use crate::gateway::upstream::{HttpUpstream, PricingUpstream};
use crate::http::locale_switch::switch_locale;
use crate::http::pages::page_context;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::state::AppState;
use crate::lifecycle::ShutdownSignal;
use crate::routing::{locale_middleware, root::root_redirect};

/// HTTP server for the storefront gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server forwarding to the configured upstream over HTTP.
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_upstream(config, Arc::new(HttpUpstream::new()))
    }

    /// Create a server with a caller-supplied upstream client.
    pub fn with_upstream(config: GatewayConfig, upstream: Arc<dyn PricingUpstream>) -> Self {
        let state = AppState::new(config, upstream);
        let router = Self::build_router(&state);
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer settings (timeouts, limits, headers) are fixed at build time;
    /// reloads affect routing, locale and upstream settings only.
    #[allow(deprecated)]
    pub fn build_router(state: &AppState) -> Router {
        let config = state.runtime.load_full().config.clone();

        let api = Router::new()
            .route("/recommendations/apply", post(apply_price))
            .route("/recommendations/{product_id}", get(get_recommendation))
            .route("/locale/switch", get(switch_locale))
            .route("/health", get(health))
            .fallback(api_not_found)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(middleware::map_response(json_payload_too_large));

        let pages = Router::new()
            .route("/", get(root_redirect))
            .fallback(page_context)
            .layer(middleware::from_fn_with_state(state.clone(), locale_middleware))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size));

        let mut router = Router::new()
            .nest("/api", api)
            .merge(pages)
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ));
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                state.reload(config);
                tracing::info!("Configuration applied");
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Body-limit rejections come from the limit layer or the body extractor as
/// plain text; `/api` callers get the usual `{"error": ...}` shape. JSON 413s
/// relayed from upstream pass through.
async fn json_payload_too_large(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        GatewayError::PayloadTooLarge.into_response()
    } else {
        response
    }
}
