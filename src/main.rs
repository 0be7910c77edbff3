//! Gateway entry point: CLI parsing, logging setup and wiring of the
//! decision engine's collaborators.

use std::sync::Arc;

use clap::Parser;
use jsonwebtoken::Algorithm;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_gateway::auth::{build_decoding_key, ClaimAuthorizer, JwtAuthenticator};
use auth_gateway::cli::Cli;
use auth_gateway::config::{finalize_config, read_config};
use auth_gateway::http::{AppState, GatewayServer, Upstream};
use auth_gateway::routing::GlobRouteMatcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Overrides land before validation so flag-supplied values face
    // the same checks as file values.
    let mut config = read_config(&cli.config_path)?;
    cli.apply_overrides(&mut config);
    let config = finalize_config(config)?;

    tracing::info!(
        config_path = %cli.config_path.display(),
        route_policies = config.route_policies.len(),
        claim_policies = config.claim_policies.len(),
        upstream = config.server.upstream_url.as_deref().unwrap_or("<sidecar mode>"),
        "configuration loaded"
    );

    // Key and algorithm are parsed once; the decision path only sees
    // the finished authenticator.
    let algorithm: Algorithm = cli.signing_method.parse().map_err(|e| {
        format!("invalid signing method {:?}: {e}", cli.signing_method)
    })?;
    let decoding_key = build_decoding_key(algorithm, cli.signing_key.as_bytes())?;

    let upstream = match &config.server.upstream_url {
        Some(url) => Some(Arc::new(Upstream::new(url)?)),
        None => None,
    };

    let state = AppState {
        route_matcher: Arc::new(GlobRouteMatcher::new(config.route_policies.clone())),
        authenticator: Arc::new(JwtAuthenticator::new(
            decoding_key,
            algorithm,
            config.authentication.clone(),
        )),
        authorizer: Arc::new(ClaimAuthorizer::new(config.claim_policies.clone())),
        upstream,
        original_request_headers: config.server.original_request_headers.clone(),
    };

    let listener = TcpListener::bind(&cli.listen_address).await?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "auth-gateway started");

    GatewayServer::new(state).run(listener).await?;

    tracing::info!("auth-gateway shut down");
    Ok(())
}
