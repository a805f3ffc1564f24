//! OTLP/HTTP export targets

use std::collections::HashMap;

use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig, WithHttpConfig};

use crate::types::{optional_var, required_var, TelemetryError};

/// Service name reported when none is configured
pub const DEFAULT_SERVICE_NAME: &str = "axum";

/// Where spans and logs are exported to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtlpTarget {
    endpoint: String,
    headers: HashMap<String, String>,
}

impl OtlpTarget {
    /// Creates a target for the given base endpoint and request headers
    #[must_use]
    pub fn new(endpoint: &str, headers: HashMap<String, String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            headers,
        }
    }

    /// Creates a target that authenticates with an `Authorization` header
    #[must_use]
    pub fn with_authorization(endpoint: &str, token: &str) -> Self {
        Self::new(
            endpoint,
            HashMap::from([("Authorization".to_string(), token.to_string())]),
        )
    }

    /// Base endpoint without a trailing slash
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Headers sent with every export request
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// URL spans are posted to
    #[must_use]
    pub fn traces_url(&self) -> String {
        format!("{}/v1/traces", self.endpoint)
    }

    /// URL log records are posted to
    #[must_use]
    pub fn logs_url(&self) -> String {
        format!("{}/v1/logs", self.endpoint)
    }

    pub(crate) fn span_exporter(&self) -> Result<SpanExporter, TelemetryError> {
        Ok(SpanExporter::builder()
            .with_http()
            .with_endpoint(self.traces_url())
            .with_headers(self.headers.clone())
            .build()?)
    }

    pub(crate) fn log_exporter(&self) -> Result<LogExporter, TelemetryError> {
        Ok(LogExporter::builder()
            .with_http()
            .with_endpoint(self.logs_url())
            .with_headers(self.headers.clone())
            .build()?)
    }
}

/// Configuration for exporting to a vendor-neutral OpenTelemetry collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtlpConfig {
    /// Collector base URL (`OTEL_EXPORTER_OTLP_ENDPOINT`)
    pub endpoint: String,
    /// Value of the `Authorization` header (`OTEL_TOKEN`)
    pub token: String,
    /// Reported `service.name`
    pub service_name: String,
}

impl OtlpConfig {
    /// Reads the collector configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if `OTEL_EXPORTER_OTLP_ENDPOINT` or `OTEL_TOKEN` is not set
    pub fn from_env() -> Result<Self, TelemetryError> {
        Ok(Self {
            endpoint: required_var("OTEL_EXPORTER_OTLP_ENDPOINT")?,
            token: required_var("OTEL_TOKEN")?,
            service_name: optional_var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        })
    }

    /// Export target for this collector
    #[must_use]
    pub fn target(&self) -> OtlpTarget {
        OtlpTarget::with_authorization(&self.endpoint, &self.token)
    }
}
