//! Provider construction and subscriber installation
//!
//! Spans reach OpenTelemetry through `tracing-opentelemetry`, log events
//! through the `opentelemetry-appender-tracing` bridge. Both providers batch
//! and export on background threads owned by `opentelemetry_sdk`.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::otlp::OtlpTarget;
use crate::types::{optional_var, Environment, TelemetryError};

/// Instrumentation scope reported on exported spans
const INSTRUMENTATION_SCOPE: &str = "hello-telemetry";

/// Crates whose own events must not be fed back into the exporters
const EXPORTER_TARGETS: [&str; 6] = ["hyper", "h2", "reqwest", "tonic", "tower", "opentelemetry"];

/// Builds the resource describing a service instance
#[must_use]
pub fn service_resource(
    service_name: &str,
    service_version: &'static str,
    environment: Environment,
) -> Resource {
    Resource::builder()
        .with_service_name(service_name.to_string())
        .with_attributes([
            KeyValue::new("service.version", service_version),
            KeyValue::new("deployment.environment.name", environment.to_string()),
        ])
        .build()
}

/// Tracer and logger providers for one service
#[derive(Debug, Clone)]
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    logger_provider: SdkLoggerProvider,
}

impl Telemetry {
    /// Creates providers for `resource`, exporting to `target` when given
    ///
    /// Without a target spans and log records are produced but dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if an OTLP exporter cannot be built
    pub fn new(resource: Resource, target: Option<&OtlpTarget>) -> Result<Self, TelemetryError> {
        let mut tracer_builder = SdkTracerProvider::builder().with_resource(resource.clone());
        let mut logger_builder = SdkLoggerProvider::builder().with_resource(resource);

        if let Some(target) = target {
            tracer_builder = tracer_builder.with_batch_exporter(target.span_exporter()?);
            logger_builder = logger_builder.with_batch_exporter(target.log_exporter()?);
        }

        Ok(Self::from_providers(
            tracer_builder.build(),
            logger_builder.build(),
        ))
    }

    /// Wraps already configured providers
    #[must_use]
    pub const fn from_providers(
        tracer_provider: SdkTracerProvider,
        logger_provider: SdkLoggerProvider,
    ) -> Self {
        Self {
            tracer_provider,
            logger_provider,
        }
    }

    /// Subscriber layers forwarding spans and events to the providers
    pub fn layers<S>(&self) -> impl Layer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let tracer = self.tracer_provider.tracer(INSTRUMENTATION_SCOPE);
        let spans = tracing_opentelemetry::layer()
            .with_tracer(tracer)
            .with_filter(exporter_filter());
        let logs =
            OpenTelemetryTracingBridge::new(&self.logger_provider).with_filter(exporter_filter());

        spans.and_then(logs)
    }

    /// Installs the global propagator, tracer provider and subscriber
    ///
    /// `RUST_LOG` overrides the environment's default filter. When `console`
    /// is set, events are also printed to stdout, as JSON outside development.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is invalid or a subscriber is already installed
    pub fn init(
        self,
        environment: Environment,
        console: bool,
    ) -> Result<TelemetryGuard, TelemetryError> {
        global::set_text_map_propagator(TraceContextPropagator::new());
        global::set_tracer_provider(self.tracer_provider.clone());

        let filter = env_filter(environment)?;

        let console_layer = console.then(|| {
            if environment.json_logs() {
                fmt::layer().json().boxed()
            } else {
                fmt::layer().boxed()
            }
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(self.layers())
            .try_init()?;

        Ok(TelemetryGuard { telemetry: self })
    }
}

/// Keeps the providers alive until [`TelemetryGuard::shutdown`]
#[derive(Debug)]
#[must_use = "buffered telemetry is only flushed by `shutdown`"]
pub struct TelemetryGuard {
    telemetry: Telemetry,
}

impl TelemetryGuard {
    /// Flushes pending spans and log records and stops the exporters
    pub fn shutdown(self) {
        if let Err(err) = self.telemetry.tracer_provider.shutdown() {
            tracing::warn!("Failed to shut down tracer provider: {err}");
        }
        if let Err(err) = self.telemetry.logger_provider.shutdown() {
            tracing::warn!("Failed to shut down logger provider: {err}");
        }
    }
}

/// `RUST_LOG` when set, the environment's default otherwise
fn env_filter(environment: Environment) -> Result<EnvFilter, TelemetryError> {
    let directives = optional_var("RUST_LOG")
        .unwrap_or_else(|| environment.default_filter().to_string());
    Ok(EnvFilter::try_new(directives)?)
}

fn exporter_filter() -> Targets {
    EXPORTER_TARGETS
        .into_iter()
        .fold(Targets::new().with_default(LevelFilter::TRACE), |targets, target| {
            targets.with_target(target, LevelFilter::OFF)
        })
}
