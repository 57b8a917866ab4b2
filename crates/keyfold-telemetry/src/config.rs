//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log record
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to write log lines to stdout
    pub console_output: bool,

    /// Whether log lines are JSON
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "keyfold".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KF_SERVICE_NAME`: Service name (default: keyfold)
    /// - `KF_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `KF_CONSOLE_OUTPUT`: Log to stdout (default: true)
    /// - `KF_JSON_LOGS`: JSON log lines (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("KF_SERVICE_NAME").unwrap_or_else(|_| "keyfold".to_string()),

            log_level: env::var("KF_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: parse_flag(env::var("KF_CONSOLE_OUTPUT").ok().as_deref(), true),

            json_logs: parse_flag(env::var("KF_JSON_LOGS").ok().as_deref(), is_container),
        }
    }
}

/// `true`/`1` and `false`/`0`, case-insensitive; anything else keeps the
/// default.
pub(crate) fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
