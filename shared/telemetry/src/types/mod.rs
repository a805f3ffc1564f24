mod environment;
mod error;

pub use environment::Environment;
pub use error::TelemetryError;

pub(crate) use environment::{env_flag, optional_var, required_var};
