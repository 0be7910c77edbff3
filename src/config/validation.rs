//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (route policies reference existing
//!   claim policies, ~foreign key constraint)
//! - Reject ambiguous policies (anonymous routes naming a policy)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over `GatewayConfig`
//! - Runs before the config is accepted into the system; the decision
//!   path still defends against unknown policy names at runtime

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("upstream url could not be parsed: {0}")]
    MalformedUpstreamUrl(url::ParseError),

    #[error("upstream url scheme must be http or https, got {0:?}")]
    UnsupportedUpstreamScheme(String),

    #[error("claim policy {policy:?} contains a requirement with an unnamed claim")]
    UnnamedClaim { policy: String },

    #[error("route policy without a path definition")]
    MissingPath,

    #[error("route policy {path:?} allows anonymous access but also names policy {policy:?}")]
    AmbiguousAnonymous { path: String, policy: String },

    #[error("route policy {path:?} names non-existing claim policy {policy:?}")]
    UnknownPolicyName { path: String, policy: String },
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_server(config, &mut errors);
    validate_claim_policies(config, &mut errors);
    validate_route_policies(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_server(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let Some(raw) = &config.server.upstream_url else {
        return;
    };

    match Url::parse(raw) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedUpstreamScheme(
                    url.scheme().to_string(),
                ));
            }
        }
        Err(e) => errors.push(ValidationError::MalformedUpstreamUrl(e)),
    }
}

fn validate_claim_policies(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    for (name, requirements) in &config.claim_policies {
        for requirement in requirements {
            if requirement.claim.is_empty() {
                errors.push(ValidationError::UnnamedClaim {
                    policy: name.clone(),
                });
            }
        }
    }
}

fn validate_route_policies(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    for policy in &config.route_policies {
        if policy.path.is_empty() {
            errors.push(ValidationError::MissingPath);
        }

        if let Some(name) = &policy.policy_name {
            // anonymous routes cannot name claim policies
            if policy.allow_anonymous {
                errors.push(ValidationError::AmbiguousAnonymous {
                    path: policy.path.clone(),
                    policy: name.clone(),
                });
            }

            if !config.claim_policies.contains_key(name) {
                errors.push(ValidationError::UnknownPolicyName {
                    path: policy.path.clone(),
                    policy: name.clone(),
                });
            }
        }
    }
}
