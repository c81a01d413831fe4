//! Session identity derivation.
//!
//! Precedence: session cookie, then session header, then a freshly generated
//! token. The gateway only forwards the identity; it never stores it and never
//! sets a generated token on the client.

use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::config::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Cookie,
    Header,
    Generated,
}

impl SessionSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Header => "header",
            Self::Generated => "generated",
        }
    }
}

/// Session token derived once per request and reused for every upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    value: HeaderValue,
    source: SessionSource,
}

impl SessionIdentity {
    pub fn derive(jar: &CookieJar, headers: &HeaderMap, config: &SessionConfig) -> Self {
        let from_cookie = jar
            .get(&config.cookie_name)
            .and_then(|c| usable(c.value()));
        if let Some(value) = from_cookie {
            return Self {
                value,
                source: SessionSource::Cookie,
            };
        }

        let from_header = headers
            .get(config.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .and_then(usable);
        if let Some(value) = from_header {
            return Self {
                value,
                source: SessionSource::Header,
            };
        }

        Self::generate()
    }

    /// Fresh random identity (UUID v4, so concurrent fallbacks cannot collide).
    pub fn generate() -> Self {
        let token = format!("session_{}", Uuid::new_v4().simple());
        Self {
            value: HeaderValue::from_str(&token).unwrap_or_else(|_| HeaderValue::from_static("session_unknown")),
            source: SessionSource::Generated,
        }
    }

    pub fn as_str(&self) -> &str {
        self.value.to_str().unwrap_or_default()
    }

    pub fn header_value(&self) -> HeaderValue {
        self.value.clone()
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }
}

fn usable(raw: &str) -> Option<HeaderValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    HeaderValue::from_str(trimmed).ok()
}
