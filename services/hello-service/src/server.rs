use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::{middleware, Router};
use telemetry::http::{endpoint_span, trace_layer, HttpTraceConfig};
use telemetry::shutdown::shutdown_signal;
use telemetry::Environment;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

/// Options for running one instance of the hello service
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Name used in startup logs
    pub name: &'static str,
    /// Deployment environment
    pub environment: Environment,
    /// Port used when `PORT` is not set
    pub default_port: u16,
    /// Request instrumentation options
    pub trace: HttpTraceConfig,
}

/// Time a request may take before it is answered with 408
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the instrumented router
pub fn router(trace: HttpTraceConfig) -> Router {
    instrument(crate::build_http_router(), trace)
}

/// Adds request tracing and the request timeout to `router`
///
/// The timeout sits inside the trace layer so timed out requests still end
/// their span with the 408 status.
pub fn instrument(mut router: Router, trace: HttpTraceConfig) -> Router {
    if trace.extra_spans {
        // Give the handler its own span below the request span
        router = router.layer(middleware::from_fn(endpoint_span));
    }

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        // Start an OpenTelemetry server span on incoming requests
        .layer(trace_layer(trace))
}

/// Starts the server and serves until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(options: ServerOptions) -> anyhow::Result<()> {
    let router = router(options.trace);

    let addr = SocketAddr::new(
        options.environment.bind_ip(),
        options.environment.port(options.default_port)?,
    );

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 {} started on http://{addr}", options.name);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
