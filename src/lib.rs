//! Authentication and authorization gateway.
//!
//! Sits in front of an upstream HTTP service (or runs standalone as an
//! auth-decision sidecar) and decides, per request, whether to forward
//! it, reject it as unauthenticated (401) or reject it as unauthorized
//! (403).
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌─────────────────────────────────────────────┐
//!                      │                AUTH GATEWAY                 │
//!                      │                                             │
//!   Client Request     │  ┌─────────┐   ┌───────────┐   ┌─────────┐ │
//!   ───────────────────┼─▶│  http   │──▶│  routing  │──▶│  auth   │ │
//!                      │  │ server  │   │  matcher  │   │ engine  │ │
//!                      │  └─────────┘   └───────────┘   └────┬────┘ │
//!                      │                                     │      │
//!                      │          allow                      │ deny │
//!   Client Response    │       ┌──────────────┐              ▼      │
//!   ◀──────────────────┼───────│   upstream   │       401 / 403 /   │
//!                      │       │   forward    │           500       │
//!                      │       └──────────────┘                     │
//!                      │                                            │
//!                      │  ┌──────────────────────────────────────┐  │
//!                      │  │        Cross-Cutting Concerns        │  │
//!                      │  │  ┌────────┐ ┌────────┐ ┌──────────┐  │  │
//!                      │  │  │ config │ │ errors │ │ tracing  │  │  │
//!                      │  │  └────────┘ └────────┘ └──────────┘  │  │
//!                      │  └──────────────────────────────────────┘  │
//!                      └─────────────────────────────────────────────┘
//! ```
//!
//! Route policies, claim policies and the signing key are loaded once
//! at startup and shared read-only across request tasks; the only
//! per-request state is local to the handler invocation.

// Core subsystems
pub mod auth;
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod cli;
pub mod errors;

pub use config::schema::GatewayConfig;
pub use errors::{AuthError, PatternError, PolicyError};
pub use http::GatewayServer;
