use anyhow::Result;
use hello_service::server::{self, ServerOptions};
use telemetry::http::HttpTraceConfig;
use telemetry::otlp::OtlpConfig;
use telemetry::pipeline::service_resource;
use telemetry::{Environment, Telemetry};
use tracing::info;

const DEFAULT_PORT: u16 = 8001;

#[tokio::main]
async fn main() -> Result<()> {
    // Local development keeps secrets in .env
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    // Endpoint and token are required, startup aborts without them
    let config = OtlpConfig::from_env()?;
    let target = config.target();

    let resource = service_resource(
        &config.service_name,
        env!("CARGO_PKG_VERSION"),
        environment,
    );
    let telemetry = Telemetry::new(resource, Some(&target))?.init(environment, true)?;

    info!(
        traces = %target.traces_url(),
        logs = %target.logs_url(),
        "✅ Exporting telemetry over OTLP/HTTP"
    );
    info!("Starting OpenTelemetry hello service in {environment} environment");

    let result = server::start(ServerOptions {
        name: "OpenTelemetry hello service",
        environment,
        default_port: DEFAULT_PORT,
        trace: HttpTraceConfig::default(),
    })
    .await;

    // Flush buffered spans and logs before exiting
    telemetry.shutdown();

    info!("✅ OpenTelemetry hello service shutdown complete");

    result
}
