use std::env;

use telemetry::pipeline::service_resource;
use telemetry::{Environment, Telemetry, TelemetryError};

fn telemetry() -> Telemetry {
    let resource = service_resource("hello", "0.1.0", Environment::Production);
    Telemetry::new(resource, None).unwrap()
}

// A process has one global subscriber, so the steps run in order
#[test]
fn test_init_lifecycle() {
    env::set_var("RUST_LOG", "info,hyper=notalevel[");
    let result = telemetry().init(Environment::Production, true);
    assert!(matches!(result, Err(TelemetryError::Filter(_))));

    env::remove_var("RUST_LOG");
    let guard = telemetry()
        .init(Environment::Production, true)
        .expect("JSON console subscriber installs");
    tracing::info!(custom_key = "custom_value", "Printed as JSON");

    let second = telemetry().init(Environment::Development, false);
    assert!(matches!(second, Err(TelemetryError::Subscriber(_))));

    guard.shutdown();
}
