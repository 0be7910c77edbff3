//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, method)
//!     → matcher.rs (normalize, evaluate glob + method conditions)
//!     → Return: matched RoutePolicy list in configured order
//!
//! Route Ordering (at startup):
//!     RoutePolicy[]
//!     → specificity.rs (sort, most specific first)
//!     → Frozen into the immutable GatewayConfig
//! ```
//!
//! # Design Decisions
//! - Policies ordered at startup, immutable at runtime
//! - The matcher preserves input order; specificity is decided once,
//!   at config load, not per request
//! - Deterministic: same path/method always matches the same policies
//! - A malformed pattern aborts the whole match, never partial results

pub mod matcher;
pub mod specificity;

pub use matcher::{normalize_path, GlobRouteMatcher, RouteMatcher};
pub use specificity::sort_by_specificity;
