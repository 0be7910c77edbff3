//! HTTP server setup and the per-request decision engine.
//!
//! # Responsibilities
//! - Create the Axum router with the gateway handler on every path
//! - Wire up middleware (tracing)
//! - Orchestrate route matching, authentication and authorization
//!   into exactly one outcome per request
//!
//! # Decision Flow
//! ```text
//! request
//!   → match route policies        (pattern fault → 500)
//!   → anonymous allowed?          (yes → forward)
//!   → authenticate bearer token   (failure → 401 + WWW-Authenticate)
//!   → authorize claims            (unknown policy → 500,
//!                                  failed claim → 403)
//!   → forward                     (no upstream → bare 200)
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{Authenticator, Authorizer};
use crate::config::schema::OriginalRequestHeaders;
use crate::http::upstream::Upstream;
use crate::routing::RouteMatcher;

/// Application state injected into the gateway handler. All members
/// are constructed once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub route_matcher: Arc<dyn RouteMatcher>,
    pub authenticator: Arc<dyn Authenticator>,
    pub authorizer: Arc<dyn Authorizer>,

    /// Forwarding target. `None` runs the gateway in sidecar mode:
    /// authorized requests are answered with a bare 200.
    pub upstream: Option<Arc<Upstream>>,

    /// When set, match the method/path carried in these headers
    /// instead of the request line.
    pub original_request_headers: Option<OriginalRequestHeaders>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Create a new server around the given state.
    pub fn new(state: AppState) -> Self {
        let router = Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// The underlying router, for driving the gateway in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }
}

/// Gateway handler: the per-request decision engine.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = Uuid::new_v4();

    // Path and method come from the request line, or from the
    // configured headers when running behind a router that forwards
    // the caller's original request out-of-band.
    let (path, method) = match &state.original_request_headers {
        None => (
            request.uri().path().to_string(),
            request.method().as_str().to_string(),
        ),
        Some(headers) => (
            header_value(&request, &headers.path),
            header_value(&request, &headers.method),
        ),
    };

    tracing::info!(request_id = %request_id, method = %method, path = %path, "request received");

    // 1. Match route policies
    let matched = match state.route_matcher.match_route_policies(&path, &method) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "route matching failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let policy_names: Vec<String> = matched
        .iter()
        .filter_map(|p| p.policy_name.clone())
        .collect();

    tracing::debug!(request_id = %request_id, policies = ?policy_names, "route policies matched");

    // 2. Anonymous fast path
    if state.authorizer.is_anonymous_allowed(&matched, &method) {
        tracing::info!(request_id = %request_id, "allowed anonymous request");
        return forward(&state, request, request_id).await;
    }

    // 3. Authenticate
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    let claims = match state.authenticator.authenticate(authorization) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!(request_id = %request_id, error = %e, "authentication failed");
            return (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
            )
                .into_response();
        }
    };

    // 4. Authorize
    match state.authorizer.authorize(&policy_names, &claims) {
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "authorization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Ok(Some(failed_claim)) => {
            tracing::info!(request_id = %request_id, claim = %failed_claim, "claim check failed");
            StatusCode::FORBIDDEN.into_response()
        }
        Ok(None) => {
            tracing::info!(request_id = %request_id, "authorized");
            forward(&state, request, request_id).await
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>, request_id: Uuid) -> Response {
    match &state.upstream {
        Some(upstream) => upstream.forward(request, request_id).await,
        None => StatusCode::OK.into_response(),
    }
}

fn header_value(request: &Request<Body>, name: &str) -> String {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
