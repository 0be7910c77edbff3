//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, gateway handler)
//!     → routing + auth decide: forward / 401 / 403 / 500
//!     → upstream.rs (forward authorized requests, stream response)
//!     → Send to client
//! ```

pub mod server;
pub mod upstream;

pub use server::{AppState, GatewayServer};
pub use upstream::Upstream;
