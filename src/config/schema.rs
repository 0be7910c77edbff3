//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from the
//! YAML config file; field names map to camelCase keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Upstream and request-indirection settings.
    pub server: ServerConfig,

    /// Token validation constraints.
    pub authentication: AuthenticationConfig,

    /// Named claim policies referenced by route policies.
    pub claim_policies: HashMap<String, Vec<ClaimRequirement>>,

    /// Route policies, most specific first after loading.
    pub route_policies: Vec<RoutePolicy>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    /// URL requests are forwarded to once authorized. When absent the
    /// gateway answers authorized requests with a bare 200 instead of
    /// proxying (sidecar mode).
    pub upstream_url: Option<String>,

    /// When set, the matched method and path are read from these
    /// headers instead of the request line. Supports deployments
    /// behind a router that issues an internal sub-request while
    /// forwarding the caller's original method/path in headers.
    pub original_request_headers: Option<OriginalRequestHeaders>,
}

/// Header names carrying the original request's method and path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalRequestHeaders {
    /// Header carrying the original HTTP method.
    pub method: String,

    /// Header carrying the original path.
    pub path: String,
}

/// Token validation constraints applied after signature verification.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthenticationConfig {
    /// Required `iss` value. No issuer check when absent.
    pub issuer: Option<String>,

    /// Required `aud` member. No audience check when absent.
    pub audience: Option<String>,

    /// Accept tokens without an `exp` claim.
    pub ignore_expiration: bool,

    /// Accept tokens without an `nbf` claim.
    pub ignore_not_before: bool,

    /// Symmetric tolerance applied to `exp` and `nbf` checks, in
    /// seconds. Absorbs clock drift between issuer and gateway.
    pub clock_skew_in_seconds: u64,
}

/// A single claim constraint inside a claim policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequirement {
    /// Claim name, e.g. `sub` or `permission`.
    pub claim: String,

    /// Acceptable values, OR'd. `None` means the claim only has to
    /// exist; its value is not inspected.
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

/// Maps a path/method pair to an authorization policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePolicy {
    /// Glob pattern matched against the normalized request path.
    /// `*` matches one path segment, `**` any number including zero.
    pub path: String,

    /// Methods this policy applies to. Empty matches every method.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Claim policy that must pass for matching requests.
    #[serde(default)]
    pub policy_name: Option<String>,

    /// Skip authentication entirely for matching requests. Mutually
    /// exclusive with `policy_name`; enforced by validation.
    #[serde(default)]
    pub allow_anonymous: bool,
}

impl RoutePolicy {
    /// Whether this policy applies to the given method. An empty
    /// method set is a wildcard; otherwise comparison is verbatim,
    /// HTTP methods being conventionally upper-case.
    pub fn matches_method(&self, method: &str) -> bool {
        self.methods.is_empty() || self.methods.iter().any(|m| m == method)
    }
}
