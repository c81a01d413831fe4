//! Gateway error taxonomy and its HTTP mapping.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message returned to clients for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors produced while handling a gateway request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required payload fields absent, null or empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A field is present but has the wrong shape.
    #[error("{field} {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Request body too large")]
    PayloadTooLarge,

    /// Request body is not JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Upstream could not be reached.
    #[error("upstream request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("failed to read upstream response body: {0}")]
    UpstreamBody(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { status, .. } => *status,
            Self::MalformedBody(_)
            | Self::Transport(_)
            | Self::Timeout(_)
            | Self::UpstreamBody(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Internal failures never expose detail.
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingFields(_) | Self::InvalidField { .. } | Self::PayloadTooLarge => {
                self.to_string()
            }
            Self::Upstream { message, .. } => message.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR && !matches!(self, Self::Upstream { .. })
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, "Gateway request failed");
        } else {
            tracing::debug!(status = %self.status(), error = %self, "Gateway request rejected");
        }
        (self.status(), Json(json!({ "error": self.client_message() }))).into_response()
    }
}
