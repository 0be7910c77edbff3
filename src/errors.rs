//! Error taxonomy for the per-request decision path.
//!
//! # Responsibilities
//! - Distinguish client faults (401/403) from internal faults (500)
//! - Carry enough context for structured logging
//! - Never conflate a malformed token (401) with a server fault (500)
//!
//! # Design Decisions
//! - One error enum per failure domain instead of a grab-bag type
//! - Failed claim checks are not errors; they are expected outcomes
//!   reported through `Authorizer::authorize`'s return value

use thiserror::Error;

/// Route pattern compilation failure.
///
/// A malformed glob in the configuration is a deployment error. It
/// aborts the whole match attempt: silently skipping a security rule
/// would change which policies apply to a request.
#[derive(Debug, Error)]
#[error("invalid route pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The configured pattern that failed to compile.
    pub pattern: String,

    #[source]
    pub source: globset::Error,
}

/// Authentication failure. Always maps to 401.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Header did not split into a `Bearer <token>` pair.
    #[error("invalid authorization header format: {0}")]
    MalformedHeader(String),

    /// Signature verification or token parsing failed.
    #[error("token verification failed: {0}")]
    InvalidSignature(#[from] jsonwebtoken::errors::Error),

    /// `exp` lies further in the past than the clock skew tolerates.
    #[error("token expired")]
    Expired,

    /// `nbf` lies further in the future than the clock skew tolerates.
    #[error("token not valid yet")]
    NotYetValid,

    /// `exp` absent while expiration checking is enabled.
    #[error("token carries no expiration claim")]
    MissingExpiration,

    /// `nbf` absent while not-before checking is enabled.
    #[error("token carries no not-before claim")]
    MissingNotBefore,

    /// `iss` absent or different from the configured issuer.
    #[error("token issuer mismatch")]
    InvalidIssuer,

    /// `aud` absent or not containing the configured audience.
    #[error("token audience mismatch")]
    InvalidAudience,
}

/// Policy resolution failure. Maps to 500: a route policy referencing
/// an unknown claim policy is a configuration fault, not a client one.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("missing policy config: {0}")]
    UnknownPolicy(String),
}
