//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize configured patterns and incoming paths into one
//!   equivalence form
//! - Match paths with filesystem-style globs (`/` as separator)
//! - Match methods with empty-set-is-wildcard semantics
//!
//! # Design Decisions
//! - `*` never crosses a `/`; `**` matches any number of segments
//!   including zero (globset with `literal_separator`)
//! - Matches are returned in configured order; the config loader has
//!   already sorted policies by specificity
//! - A pattern that fails to compile aborts the whole match with no
//!   partial results

use globset::GlobBuilder;

use crate::config::schema::RoutePolicy;
use crate::errors::PatternError;

/// Trait for matching a request's path/method pair against the
/// configured route policies. Object-safe so the decision engine can
/// take a test double.
pub trait RouteMatcher: Send + Sync {
    /// Returns every policy whose path and method both match, in
    /// configured order.
    fn match_route_policies(
        &self,
        path: &str,
        method: &str,
    ) -> Result<Vec<RoutePolicy>, PatternError>;
}

/// Normalize a path or pattern to the form `/segment/.../`.
///
/// Strips any query string, trims whitespace and separators from both
/// ends, then wraps the remainder in single leading/trailing slashes,
/// so `/test`, `/test/` and `/test?q=1` are equivalent and stray
/// whitespace in configuration is tolerated.
pub fn normalize_path(raw: &str) -> String {
    let without_query = raw.split('?').next().unwrap_or_default();
    let trimmed = without_query.trim_matches(&['/', ' ', '\t', '\n'][..]);
    format!("/{trimmed}/")
}

/// Glob-based [`RouteMatcher`] implementation.
#[derive(Debug, Clone)]
pub struct GlobRouteMatcher {
    route_policies: Vec<RoutePolicy>,
}

impl GlobRouteMatcher {
    /// Create a matcher over the given policies. The list is expected
    /// in loader output order (most specific first) and is kept as-is.
    pub fn new(route_policies: Vec<RoutePolicy>) -> Self {
        Self { route_policies }
    }
}

impl RouteMatcher for GlobRouteMatcher {
    fn match_route_policies(
        &self,
        path: &str,
        method: &str,
    ) -> Result<Vec<RoutePolicy>, PatternError> {
        let normalized_path = normalize_path(path);

        let mut matches = Vec::new();
        for policy in &self.route_policies {
            let pattern = normalize_path(&policy.path);

            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| PatternError {
                    pattern: policy.path.clone(),
                    source,
                })?;

            if !glob.compile_matcher().is_match(&normalized_path) {
                continue;
            }

            if policy.matches_method(method) {
                matches.push(policy.clone());
            }
        }

        Ok(matches)
    }
}
