//! Hello service
//!
//! A single instrumented route that logs a message and returns a greeting.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// HTTP handlers module
pub mod http;

/// Server startup
pub mod server;

use axum::Router;

/// Builds the HTTP router for the hello service
pub fn build_http_router() -> Router {
    http::routes()
}
