//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via ArcSwap to handlers and middleware
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config, re-applying CLI overrides
//!     → validation.rs validates
//!     → atomic swap of the Runtime snapshot (config + compiled router)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_with, ConfigError};
pub use overrides::ConfigOverrides;
pub use schema::GatewayConfig;
pub use schema::{
    ListenerConfig, LocaleConfig, ObservabilityConfig, RoutingConfig, SecurityConfig,
    SessionConfig, TimeoutConfig, UpstreamConfig,
};
