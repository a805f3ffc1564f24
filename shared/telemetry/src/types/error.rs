use thiserror::Error;

/// Errors raised while configuring or installing telemetry
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A required environment variable is not set
    #[error("{0} environment variable is not set")]
    MissingEnvVar(&'static str),

    /// An environment variable holds a value that cannot be used
    #[error("{name} environment variable has an invalid value: {value}")]
    InvalidEnvVar {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },

    /// The OTLP exporter could not be built
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// A log filter directive could not be parsed
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
