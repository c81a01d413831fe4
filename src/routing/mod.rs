//! Locale routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming page request (path)
//!     → router.rs (ordered rule chain, first match wins)
//!     → matcher.rs (evaluate path conditions)
//!     → PathClass: Root | ExcludedDirect | LocalePrefixed
//!     → middleware.rs
//!         Root           → next (root redirect handler answers)
//!         ExcludedDirect → next, untouched
//!         LocalePrefixed → locale::negotiate → redirect | 404 | next
//!
//! Rule Compilation (at startup and on reload):
//!     RoutingConfig
//!     → root rule, then one prefix rule per excluded route
//!     → Freeze as immutable LocaleRouter
//! ```
//!
//! # Design Decisions
//! - Classification is a pure function of the path string
//! - Root and excluded routes never reach negotiation
//! - Deterministic: same input always yields the same class

pub mod matcher;
pub mod middleware;
pub mod root;
pub mod router;

pub use middleware::locale_middleware;
pub use router::{LocaleRouter, PathClass, RouteDecision};
