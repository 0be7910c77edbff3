//! Claims-based authorization.
//!
//! # Responsibilities
//! - Resolve route-policy references to claim requirement lists
//! - Evaluate requirements against a decoded claim set
//! - Decide whether the most specific matched route allows anonymous
//!   access
//!
//! # Design Decisions
//! - A failed claim check is an expected outcome (403), reported
//!   through the return value; only an unresolvable policy name is an
//!   error (500)
//! - Requirements evaluate in policy order, then requirement order,
//!   short-circuiting on the first failure
//! - Anonymous access follows the most specific matched route, with
//!   same-specificity entries refined by method

use std::collections::{HashMap, HashSet};

use crate::auth::claims::{ClaimValue, Claims};
use crate::config::schema::{ClaimRequirement, RoutePolicy};
use crate::errors::PolicyError;
use crate::routing::specificity::specificity_key;

/// Trait for the two authorization verdicts the decision engine needs.
/// Object-safe so it can be replaced with a test double.
pub trait Authorizer: Send + Sync {
    /// Evaluate the named claim policies against the claim set.
    /// Returns the first failing claim's name, or `None` when every
    /// requirement passes.
    fn authorize(
        &self,
        policy_names: &[String],
        claims: &Claims,
    ) -> Result<Option<String>, PolicyError>;

    /// Whether the most specific matched route allows the request
    /// through without authentication. `matched` must be in
    /// specificity order as produced by the config loader.
    fn is_anonymous_allowed(&self, matched: &[RoutePolicy], method: &str) -> bool;
}

/// [`Authorizer`] implementation over the configured claim policies.
#[derive(Debug, Clone)]
pub struct ClaimAuthorizer {
    claim_policies: HashMap<String, Vec<ClaimRequirement>>,
}

impl ClaimAuthorizer {
    pub fn new(claim_policies: HashMap<String, Vec<ClaimRequirement>>) -> Self {
        Self { claim_policies }
    }

    /// Resolve policy names to their concatenated requirement lists,
    /// deduplicating names (first occurrence wins) and preserving
    /// policy order, then per-policy requirement order.
    fn resolve(&self, policy_names: &[String]) -> Result<Vec<&ClaimRequirement>, PolicyError> {
        let mut seen = HashSet::new();
        let mut requirements = Vec::new();

        for name in policy_names {
            if !seen.insert(name.as_str()) {
                continue;
            }

            let policy = self
                .claim_policies
                .get(name)
                .ok_or_else(|| PolicyError::UnknownPolicy(name.clone()))?;

            requirements.extend(policy.iter());
        }

        Ok(requirements)
    }
}

impl Authorizer for ClaimAuthorizer {
    fn authorize(
        &self,
        policy_names: &[String],
        claims: &Claims,
    ) -> Result<Option<String>, PolicyError> {
        for requirement in self.resolve(policy_names)? {
            let Some(value) = claims.get(&requirement.claim) else {
                return Ok(Some(requirement.claim.clone()));
            };

            // no configured values: existence alone satisfies
            let Some(accepted) = &requirement.values else {
                continue;
            };

            let passed = match value.as_sequence() {
                // array claim: OR across elements and accepted values
                Some(items) => items
                    .iter()
                    .any(|item| accepted.iter().any(|a| item.stringify() == *a)),
                None => accepted.iter().any(|a| value.stringify() == *a),
            };

            if !passed {
                return Ok(Some(requirement.claim.clone()));
            }
        }

        Ok(None)
    }

    fn is_anonymous_allowed(&self, matched: &[RoutePolicy], method: &str) -> bool {
        // unmatched routes require authentication
        let Some(head) = matched.first() else {
            return false;
        };

        // Walk the entries tying with the head in specificity; the
        // first one applying to the method supplies the verdict. This
        // resolves routes declared for the same path but different
        // method subsets (e.g. GET anonymous, POST authenticated).
        let head_key = specificity_key(&head.path);
        for policy in matched {
            if specificity_key(&policy.path) != head_key {
                break;
            }

            if policy.matches_method(method) {
                return policy.allow_anonymous;
            }
        }

        head.allow_anonymous
    }
}
