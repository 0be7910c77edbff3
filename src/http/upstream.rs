//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the configured upstream authority
//! - Forward the otherwise unmodified request
//! - Stream the upstream response back to the client
//!
//! # Design Decisions
//! - The request reaches this point only after a Forward decision;
//!   no authentication state leaks into the forwarded request
//! - Plain and TLS upstreams share one connector; the scheme decides
//!   per connection
//! - Upstream connection failures surface as 502, never as an auth
//!   failure code

use axum::{
    body::Body,
    http::{
        uri::{Authority, Parts, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Error constructing the upstream client from a configured URL.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream url could not be parsed: {0}")]
    MalformedUrl(#[from] url::ParseError),

    #[error("upstream url {0:?} has no host")]
    MissingHost(String),

    #[error("upstream url scheme must be http or https, got {0:?}")]
    UnsupportedScheme(String),
}

/// Single-host reverse-proxy client for the configured upstream.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    scheme: Scheme,
    authority: Authority,
}

impl Upstream {
    /// Build a forwarding client for the given upstream URL.
    pub fn new(upstream_url: &str) -> Result<Self, UpstreamError> {
        let url = Url::parse(upstream_url)?;

        let authority = url
            .authority()
            .parse::<Authority>()
            .map_err(|_| UpstreamError::MissingHost(upstream_url.to_string()))?;

        // config validation checks the scheme too; this is the
        // runtime backstop for URLs that arrived another way
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(UpstreamError::UnsupportedScheme(other.to_string())),
        };

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme,
            authority,
        })
    }

    /// Forward the request to the upstream and return its response.
    pub async fn forward(&self, request: Request<Body>, request_id: Uuid) -> Response {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = Parts::default();
        uri_parts.scheme = Some(self.scheme.clone());
        uri_parts.authority = Some(self.authority.clone());
        uri_parts.path_and_query = Some(
            parts
                .uri
                .path_and_query()
                .cloned()
                .unwrap_or_else(|| PathAndQuery::from_static("/")),
        );

        parts.uri = match Uri::from_parts(uri_parts) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "could not build upstream uri");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "upstream request failed");
                (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
            }
        }
    }
}
