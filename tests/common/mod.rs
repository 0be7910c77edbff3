//! Shared utilities for integration testing the gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header};
use tokio::net::TcpListener;

use auth_gateway::auth::{ClaimAuthorizer, JwtAuthenticator};
use auth_gateway::config::parse_config;
use auth_gateway::http::{AppState, GatewayServer, Upstream};
use auth_gateway::routing::GlobRouteMatcher;

/// HMAC secret shared between the gateway under test and the token
/// minting helpers.
pub const SECRET: &[u8] = b"integration-test-secret";

/// Build a gateway router from YAML config text, optionally forwarding
/// to an upstream.
pub fn gateway_router(yaml: &str, upstream_url: Option<&str>) -> Router {
    let config = parse_config(yaml).expect("test config should be valid");

    let state = AppState {
        route_matcher: Arc::new(GlobRouteMatcher::new(config.route_policies.clone())),
        authenticator: Arc::new(JwtAuthenticator::new(
            DecodingKey::from_secret(SECRET),
            Algorithm::HS256,
            config.authentication.clone(),
        )),
        authorizer: Arc::new(ClaimAuthorizer::new(config.claim_policies.clone())),
        upstream: upstream_url.map(|url| Arc::new(Upstream::new(url).unwrap())),
        original_request_headers: config.server.original_request_headers.clone(),
    };

    GatewayServer::new(state).router()
}

/// Mint a bearer header value signed with the shared test secret.
pub fn bearer(claims: &serde_json::Value) -> String {
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    format!("Bearer {token}")
}

/// Claims with valid temporal bounds, merged with the given extras.
pub fn fresh_claims(extra: serde_json::Value) -> serde_json::Value {
    let now = get_current_timestamp();
    let mut claims = serde_json::json!({ "exp": now + 300, "nbf": now - 300 });
    if let (Some(claims), Some(extra)) = (claims.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            claims.insert(k.clone(), v.clone());
        }
    }
    claims
}

/// Start a mock upstream that answers every request with the given
/// body, returning its address.
pub async fn start_mock_upstream(body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(move || async move { body });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}
