//! Environment configuration for different deployment stages

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use super::TelemetryError;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (local machine)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Default `EnvFilter` directive used when `RUST_LOG` is not set
    #[must_use]
    pub const fn default_filter(&self) -> &'static str {
        match self {
            Self::Production | Self::Staging => "info",
            Self::Development => "debug",
        }
    }

    /// Whether console logs are emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub const fn bind_ip(&self) -> IpAddr {
        match self {
            Self::Production | Self::Staging => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Self::Development => IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }

    /// Port the HTTP server listens on, overridable with `PORT`
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number
    pub fn port(&self, default: u16) -> Result<u16, TelemetryError> {
        env::var("PORT").map_or(Ok(default), |p| {
            p.trim().parse().map_err(|_| TelemetryError::InvalidEnvVar {
                name: "PORT",
                value: p,
            })
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        };
        f.write_str(name)
    }
}

/// Reads a required environment variable
pub(crate) fn required_var(name: &'static str) -> Result<String, TelemetryError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(TelemetryError::MissingEnvVar(name))
}

/// Reads an optional environment variable, treating empty values as unset
pub(crate) fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Reads a boolean flag, falling back to `default` when unset
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    optional_var(name).map_or(default, |v| {
        matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes")
    })
}
