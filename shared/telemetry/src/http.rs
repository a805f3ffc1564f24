//! Server-side HTTP request tracing
//!
//! Every request gets a `server` span named `"{METHOD} {route}"`, continued
//! from an incoming W3C `traceparent` when one is present. Requests matching
//! no route are named by method alone so raw paths never become span names.

use std::time::Duration;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use http::header::USER_AGENT;
use http::HeaderMap;
use opentelemetry::global;
use opentelemetry_http::HeaderExtractor;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, OnResponse, TraceLayer};
use tracing::field::Empty;
use tracing::{Instrument, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Placeholder recorded instead of sensitive header values
pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_HEADERS: [&str; 5] = [
    "authorization",
    "cookie",
    "proxy-authorization",
    "set-cookie",
    "x-api-key",
];

/// Request instrumentation options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTraceConfig {
    /// Record request headers as `http.request.header.<name>` attributes
    pub capture_headers: bool,
    /// Wrap handler execution in its own span
    pub extra_spans: bool,
}

/// Tracing layer used in front of every route
pub type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, (), RecordStatus>;

/// Builds the request tracing layer
#[must_use]
pub fn trace_layer(config: HttpTraceConfig) -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan {
            capture_headers: config.capture_headers,
        })
        .on_request(())
        .on_response(RecordStatus)
}

/// Opens the server span for a request
#[derive(Debug, Clone, Copy)]
pub struct RequestSpan {
    capture_headers: bool,
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        let method = request.method().as_str();
        let route = route(request);
        let name = route
            .as_deref()
            .map_or_else(|| method.to_string(), |route| format!("{method} {route}"));

        let span = tracing::info_span!(
            "request",
            otel.name = %name,
            otel.kind = "server",
            otel.status_code = Empty,
            http.request.method = %method,
            http.route = Empty,
            url.path = %request.uri().path(),
            user_agent.original = Empty,
            http.response.status_code = Empty,
        );

        if let Some(route) = &route {
            span.record("http.route", route.as_str());
        }
        if let Some(agent) = request
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
        {
            span.record("user_agent.original", agent);
        }

        let parent = global::get_text_map_propagator(|propagator| {
            propagator.extract(&HeaderExtractor(request.headers()))
        });
        let _ = span.set_parent(parent);

        if self.capture_headers {
            record_headers(&span, request.headers());
        }

        span
    }
}

/// Records the response status on the request span
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStatus;

impl<B> OnResponse<B> for RecordStatus {
    fn on_response(self, response: &http::Response<B>, _latency: Duration, span: &Span) {
        let status = response.status();
        span.record("http.response.status_code", i64::from(status.as_u16()));
        if status.is_server_error() {
            span.record("otel.status_code", "ERROR");
        }
    }
}

/// Middleware wrapping handler execution in a child span
pub async fn endpoint_span(request: Request, next: Next) -> Response {
    let name = match route(&request) {
        Some(route) => format!("{} {route} (handler)", request.method()),
        None => format!("{} (handler)", request.method()),
    };
    let span = tracing::info_span!("handler", otel.name = %name);

    next.run(request).instrument(span).await
}

/// Whether a header value must not be recorded
#[must_use]
pub fn is_sensitive(header: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(header))
}

fn route<B>(request: &http::Request<B>) -> Option<String> {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
}

fn record_headers(span: &Span, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if is_sensitive(name.as_str()) {
            REDACTED.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        span.set_attribute(format!("http.request.header.{}", name.as_str()), value);
    }
}
