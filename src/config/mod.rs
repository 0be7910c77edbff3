//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → specificity sort (routing::specificity)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Route policies are sorted by specificity exactly once, here, so
//!   the matcher and the authorizer can rely on the order at runtime

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{finalize_config, parse_config, read_config, ConfigError};
pub use schema::{
    AuthenticationConfig, ClaimRequirement, GatewayConfig, OriginalRequestHeaders, RoutePolicy,
    ServerConfig,
};
