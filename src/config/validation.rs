//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream base URL and listener address
//! - Validate value ranges (timeouts > 0)
//! - Detect routing rules that would loop through locale negotiation
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new("listener.max_connections", "must be > 0"));
    }

    match Url::parse(&config.upstream.base_url) {
        // The upstream connector speaks plain HTTP only.
        Ok(url) if url.scheme() == "http" => {
            if url.cannot_be_a_base() {
                errors.push(ValidationError::new("upstream.base_url", "cannot be a base URL"));
            }
        }
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("invalid URL: {}", e),
        )),
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be > 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }
    // The request timeout must outlast the upstream call, or the outer layer
    // answers first and the upstream failure is never mapped or logged.
    if config.upstream.timeout_secs > 0
        && config.timeouts.request_secs > 0
        && config.upstream.timeout_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::new(
            "upstream.timeout_secs",
            format!(
                "must be less than timeouts.request_secs ({})",
                config.timeouts.request_secs
            ),
        ));
    }

    let routing = &config.routing;
    if !is_route_path(&routing.root_redirect) {
        errors.push(ValidationError::new(
            "routing.root_redirect",
            "must start with '/' and must not be '/'",
        ));
    }
    for (i, prefix) in routing.excluded_prefixes.iter().enumerate() {
        if !is_route_path(prefix) || prefix.ends_with('/') {
            errors.push(ValidationError::new(
                format!("routing.excluded_prefixes[{i}]"),
                format!("'{}' must start with '/' and must not end with '/'", prefix),
            ));
        }
    }
    // A root redirect into a locale-negotiated path would bounce through a second redirect.
    let redirect_excluded = routing.excluded_prefixes.iter().any(|prefix| {
        routing.root_redirect == *prefix
            || routing
                .root_redirect
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    });
    if !redirect_excluded {
        errors.push(ValidationError::new(
            "routing.root_redirect",
            "must fall under one of routing.excluded_prefixes",
        ));
    }

    if config.locale.preference_cookie.trim().is_empty() {
        errors.push(ValidationError::new("locale.preference_cookie", "must not be empty"));
    }
    if config.session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    }
    if axum::http::HeaderName::from_bytes(config.session.header_name.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "session.header_name",
            "not a valid HTTP header name",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_route_path(path: &str) -> bool {
    path.starts_with('/') && path.len() > 1 && !path.starts_with("//")
}
