//! Command-line overrides layered over the file configuration.
//!
//! Applied before validation on the initial load and on every reload, so a
//! file edit never silently undoes a flag.

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces `listener.bind_address`.
    pub bind_address: Option<String>,
    /// Replaces `upstream.base_url`.
    pub upstream_base_url: Option<String>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.bind_address.is_none() && self.upstream_base_url.is_none()
    }

    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
        if let Some(upstream) = &self.upstream_base_url {
            config.upstream.base_url = upstream.clone();
        }
    }
}
