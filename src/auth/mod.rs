//! Authentication and authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → authenticator.rs (scheme check, signature, temporal/issuer/
//!       audience constraints)
//!     → claims.rs (decoded payload as ClaimValue map)
//!     → authorizer.rs (claim requirements, anonymous-access verdict)
//!     → Decision: pass / failed claim / internal policy fault
//! ```
//!
//! # Design Decisions
//! - Authenticator and authorizer are traits so the decision engine
//!   can be exercised with test doubles
//! - The authenticator is an explicit, immutably-constructed value;
//!   no global key or algorithm state
//! - Signature verification is pure CPU work; nothing here blocks or
//!   performs I/O

pub mod authenticator;
pub mod authorizer;
pub mod claims;
pub mod keys;

pub use authenticator::{Authenticator, JwtAuthenticator};
pub use authorizer::{Authorizer, ClaimAuthorizer};
pub use claims::{ClaimValue, Claims};
pub use keys::build_decoding_key;
