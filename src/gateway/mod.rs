//! Proxy gateway subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/recommendations/apply (raw JSON)
//!     → payload.rs (validate; reject before any upstream call)
//!     → session.rs (cookie → header → generated identity)
//!     → upstream.rs (single forward, bounded by upstream.timeout_secs)
//!     → UpstreamResult: Success (verbatim) | Failure (status + message)
//!     → error.rs (GatewayError → normalized JSON response)
//! ```
//!
//! # Design Decisions
//! - No retries and no idempotency keys; the upstream owns both
//! - Upstream status codes are relayed, never remapped
//! - Internal failures are logged with detail and answered generically

pub mod error;
pub mod handlers;
pub mod payload;
pub mod session;
pub mod upstream;

pub use error::GatewayError;
pub use payload::{ApplyPricePayload, ProductId};
pub use session::{SessionIdentity, SessionSource};
pub use upstream::{HttpUpstream, PricingUpstream, UpstreamRequest, UpstreamResponse, UpstreamResult};
