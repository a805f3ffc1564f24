// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use hello_service::server;
use http_body_util::BodyExt;
use opentelemetry::global;
use opentelemetry_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider, SdkLogRecord};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use telemetry::http::HttpTraceConfig;
use telemetry::Telemetry;
use tower::ServiceExt;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;

/// Router plus in-memory exporters capturing everything it emits
pub struct TestSetup {
    pub router: Router,
    spans: InMemorySpanExporter,
    logs: InMemoryLogExporter,
    _guard: DefaultGuard,
}

impl TestSetup {
    /// Creates the service router instrumented with `trace`
    pub fn new(trace: HttpTraceConfig) -> Self {
        Self::with_router(server::router(trace))
    }

    /// Wraps an already instrumented `router` with a thread-local subscriber
    ///
    /// Tests must run on the current-thread runtime so that the subscriber
    /// sees every event the router emits.
    pub fn with_router(router: Router) -> Self {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let spans = InMemorySpanExporter::default();
        let logs = InMemoryLogExporter::default();
        let telemetry = Telemetry::from_providers(
            SdkTracerProvider::builder()
                .with_simple_exporter(spans.clone())
                .build(),
            SdkLoggerProvider::builder()
                .with_simple_exporter(logs.clone())
                .build(),
        );
        let subscriber = tracing_subscriber::registry().with(telemetry.layers());

        Self {
            router,
            spans,
            logs,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub async fn send_request(
        &self,
        request: Request<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        self.send_request(request).await
    }

    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.spans.get_finished_spans().unwrap()
    }

    pub fn emitted_logs(&self) -> Vec<SdkLogRecord> {
        self.logs
            .get_emitted_logs()
            .unwrap()
            .into_iter()
            .map(|log| log.record)
            .collect()
    }
}

/// Collects a response body into bytes
pub async fn read_body(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
