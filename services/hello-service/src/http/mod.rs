mod handlers;

use axum::{routing::get, Router};

pub use handlers::{HelloResponse, GREETING};

/// Creates the routes for this service
pub fn routes() -> Router {
    Router::new().route("/", get(handlers::hello))
}
