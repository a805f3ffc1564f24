//! Logfire export configuration
//!
//! Logfire ingests OTLP over HTTP. Write tokens encode the region of the
//! project they belong to (`pylf_v1_us_...`, `pylf_v1_eu_...`), which selects
//! the ingest URL unless `LOGFIRE_BASE_URL` is set.

use crate::http::HttpTraceConfig;
use crate::otlp::{OtlpTarget, DEFAULT_SERVICE_NAME};
use crate::types::{env_flag, optional_var};

/// Ingest URL for projects in the US region
pub const US_BASE_URL: &str = "https://logfire-us.pydantic.dev";

/// Ingest URL for projects in the EU region
pub const EU_BASE_URL: &str = "https://logfire-eu.pydantic.dev";

/// Ingest URL used when the token does not name a region
pub const DEFAULT_BASE_URL: &str = "https://logfire-api.pydantic.dev";

/// Logfire configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogfireConfig {
    /// Project write token, nothing is exported without one
    pub token: Option<String>,
    /// Ingest base URL
    pub base_url: String,
    /// Reported `service.name`
    pub service_name: String,
    /// Whether logs are also printed to the console
    pub console: bool,
    /// Whether request headers are recorded on request spans
    pub capture_headers: bool,
    /// Whether handler execution gets its own span
    pub extra_spans: bool,
}

impl LogfireConfig {
    /// Reads the Logfire configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let token = optional_var("LOGFIRE_TOKEN");
        let base_url = optional_var("LOGFIRE_BASE_URL")
            .unwrap_or_else(|| base_url_for_token(token.as_deref()).to_string());
        let service_name = optional_var("LOGFIRE_SERVICE_NAME")
            .or_else(|| optional_var("OTEL_SERVICE_NAME"))
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Self {
            token,
            base_url,
            service_name,
            console: env_flag("LOGFIRE_CONSOLE", false),
            capture_headers: env_flag("LOGFIRE_CAPTURE_HEADERS", true),
            extra_spans: env_flag("LOGFIRE_EXTRA_SPANS", true),
        }
    }

    /// Export target, or `None` when no token is configured
    #[must_use]
    pub fn target(&self) -> Option<OtlpTarget> {
        self.token
            .as_deref()
            .map(|token| OtlpTarget::with_authorization(&self.base_url, token))
    }

    /// Whether console output is on
    ///
    /// Forced on without a token, since nothing leaves the process then.
    #[must_use]
    pub const fn console_enabled(&self) -> bool {
        self.console || self.token.is_none()
    }

    /// Request instrumentation options
    #[must_use]
    pub const fn http_trace_config(&self) -> HttpTraceConfig {
        HttpTraceConfig {
            capture_headers: self.capture_headers,
            extra_spans: self.extra_spans,
        }
    }
}

/// Picks the ingest URL from the region embedded in a write token
#[must_use]
pub fn base_url_for_token(token: Option<&str>) -> &'static str {
    let region = token.and_then(|token| {
        let mut parts = token.splitn(4, '_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("pylf"), Some(version), Some(region)) if version.starts_with('v') => {
                Some(region)
            }
            _ => None,
        }
    });

    match region {
        Some("us") => US_BASE_URL,
        Some("eu") => EU_BASE_URL,
        _ => DEFAULT_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        for name in [
            "LOGFIRE_TOKEN",
            "LOGFIRE_BASE_URL",
            "LOGFIRE_SERVICE_NAME",
            "OTEL_SERVICE_NAME",
            "LOGFIRE_CONSOLE",
            "LOGFIRE_CAPTURE_HEADERS",
            "LOGFIRE_EXTRA_SPANS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_region_from_token() {
        assert_eq!(base_url_for_token(Some("pylf_v1_us_abc123")), US_BASE_URL);
        assert_eq!(base_url_for_token(Some("pylf_v1_eu_abc123")), EU_BASE_URL);
        assert_eq!(base_url_for_token(Some("pylf_v2_ap_abc123")), DEFAULT_BASE_URL);
        assert_eq!(base_url_for_token(Some("legacy-token")), DEFAULT_BASE_URL);
        assert_eq!(base_url_for_token(None), DEFAULT_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_defaults_without_token() {
        clear_env();

        let config = LogfireConfig::from_env();
        assert_eq!(
            config,
            LogfireConfig {
                token: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                service_name: DEFAULT_SERVICE_NAME.to_string(),
                console: false,
                capture_headers: true,
                extra_spans: true,
            }
        );
        assert_eq!(config.target(), None);
    }

    #[test]
    #[serial]
    fn test_console_forced_without_token() {
        clear_env();
        assert!(LogfireConfig::from_env().console_enabled());

        env::set_var("LOGFIRE_TOKEN", "pylf_v1_us_secret");
        assert!(!LogfireConfig::from_env().console_enabled());

        env::set_var("LOGFIRE_CONSOLE", "true");
        assert!(LogfireConfig::from_env().console_enabled());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_token_selects_target() {
        clear_env();
        env::set_var("LOGFIRE_TOKEN", "pylf_v1_eu_secret");

        let target = LogfireConfig::from_env().target().unwrap();
        assert_eq!(target.traces_url(), format!("{EU_BASE_URL}/v1/traces"));
        assert_eq!(target.logs_url(), format!("{EU_BASE_URL}/v1/logs"));
        assert_eq!(
            target.headers().get("Authorization").map(String::as_str),
            Some("pylf_v1_eu_secret")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("LOGFIRE_TOKEN", "pylf_v1_us_secret");
        env::set_var("LOGFIRE_BASE_URL", "http://localhost:4318/");
        env::set_var("OTEL_SERVICE_NAME", "from-otel");
        env::set_var("LOGFIRE_SERVICE_NAME", "hello-logfire");
        env::set_var("LOGFIRE_CONSOLE", "true");
        env::set_var("LOGFIRE_CAPTURE_HEADERS", "false");

        let config = LogfireConfig::from_env();
        assert_eq!(config.service_name, "hello-logfire");
        assert!(config.console);
        assert_eq!(
            config.http_trace_config(),
            HttpTraceConfig {
                capture_headers: false,
                extra_spans: true,
            }
        );
        assert_eq!(
            config.target().unwrap().traces_url(),
            "http://localhost:4318/v1/traces"
        );

        clear_env();
    }
}
