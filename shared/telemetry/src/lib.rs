//! Telemetry bootstrap shared by the hello services
//!
//! Builds OpenTelemetry tracer and logger providers that export over
//! OTLP/HTTP, wires them into a `tracing` subscriber and provides the HTTP
//! request instrumentation used by the axum routers.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// HTTP request instrumentation
pub mod http;

/// Logfire export configuration
pub mod logfire;

/// Vendor-neutral OTLP collector configuration
pub mod otlp;

/// Provider construction and subscriber installation
pub mod pipeline;

/// Process shutdown signal
pub mod shutdown;

/// Environment and error types
pub mod types;

pub use pipeline::{Telemetry, TelemetryGuard};
pub use types::{Environment, TelemetryError};
