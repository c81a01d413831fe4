//! Storefront gateway library: locale routing and pricing proxy.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod locale;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
