//! Shared application state.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::GatewayConfig;
use crate::gateway::upstream::PricingUpstream;
use crate::routing::LocaleRouter;

/// Configuration snapshot with its compiled router, swapped as one unit.
#[derive(Debug)]
pub struct Runtime {
    pub config: GatewayConfig,
    pub router: LocaleRouter,
}

impl Runtime {
    pub fn new(config: GatewayConfig) -> Self {
        let router = LocaleRouter::new(&config.routing, config.locale.clone());
        Self { config, router }
    }
}

/// State injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ArcSwap<Runtime>>,
    pub upstream: Arc<dyn PricingUpstream>,
}

impl AppState {
    pub fn new(config: GatewayConfig, upstream: Arc<dyn PricingUpstream>) -> Self {
        Self {
            runtime: Arc::new(ArcSwap::from_pointee(Runtime::new(config))),
            upstream,
        }
    }

    /// Replace the active configuration. In-flight requests keep their snapshot.
    pub fn reload(&self, config: GatewayConfig) {
        self.runtime.store(Arc::new(Runtime::new(config)));
    }
}
