//! Specificity ordering over route policies.
//!
//! When several glob patterns match the same concrete path, "the most
//! specific route wins" is only well-defined under a total order. The
//! order used here:
//!
//! 1. more `/`-delimited segments sorts first,
//! 2. among equal segment counts, fewer `*` wildcard characters sorts
//!    first,
//! 3. ties keep declaration order (stable sort).
//!
//! Sorting is a one-time operation performed by the config loader, not
//! folded into the matcher; the rest of the system assumes pre-sorted
//! input.

use std::cmp::Reverse;

use crate::config::schema::RoutePolicy;

const TRIM: &[char] = &['/', ' ', '\t', '\n'];

/// Segment and wildcard counts of a pattern, the two components of
/// the specificity order. Equal keys mean equal specificity.
pub fn specificity_key(path: &str) -> (usize, usize) {
    let trimmed = path.trim_matches(TRIM);

    let separators = trimmed.matches('/').count();
    let wildcards = trimmed.matches('*').count();

    (separators, wildcards)
}

/// Sort route policies with decreasing specificity, in place.
pub fn sort_by_specificity(policies: &mut [RoutePolicy]) {
    policies.sort_by_key(|p| {
        let (separators, wildcards) = specificity_key(&p.path);
        (Reverse(separators), wildcards)
    });
}
