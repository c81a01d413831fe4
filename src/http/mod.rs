//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned and propagated)
//!     → /api/*        → gateway handlers, locale_switch.rs
//!     → everything else → routing::locale_middleware → pages.rs
//!     → Send to client
//! ```

pub mod locale_switch;
pub mod pages;
pub mod request;
pub mod server;
pub mod state;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
pub use state::{AppState, Runtime};
