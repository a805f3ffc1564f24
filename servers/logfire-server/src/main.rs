use anyhow::Result;
use hello_service::server::{self, ServerOptions};
use telemetry::logfire::LogfireConfig;
use telemetry::pipeline::service_resource;
use telemetry::{Environment, Telemetry};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    // Local development keeps secrets in .env
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    let config = LogfireConfig::from_env();
    let target = config.target();

    let resource = service_resource(
        &config.service_name,
        env!("CARGO_PKG_VERSION"),
        environment,
    );

    let telemetry =
        Telemetry::new(resource, target.as_ref())?.init(environment, config.console_enabled())?;

    match &target {
        Some(target) => info!("✅ Exporting telemetry to Logfire at {}", target.endpoint()),
        None => warn!("LOGFIRE_TOKEN is not set, telemetry will not be exported"),
    }

    info!("Starting Logfire hello service in {environment} environment");

    let result = server::start(ServerOptions {
        name: "Logfire hello service",
        environment,
        default_port: DEFAULT_PORT,
        trace: config.http_trace_config(),
    })
    .await;

    // Flush buffered spans and logs before exiting
    telemetry.shutdown();

    info!("✅ Logfire hello service shutdown complete");

    result
}
