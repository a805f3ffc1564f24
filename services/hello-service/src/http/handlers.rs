use axum::Json;
use serde::Serialize;
use tracing::info;

/// Greeting returned by the root route
pub const GREETING: &str = "Hello World";

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    message: &'static str,
}

pub async fn hello() -> Json<HelloResponse> {
    info!(custom_key = "custom_value", "Log inside endpoint");

    Json(HelloResponse { message: GREETING })
}
