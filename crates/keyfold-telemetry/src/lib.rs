//! # Keyfold Telemetry
//!
//! Structured logging and Prometheus metrics for the vault.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an env filter, pretty for
//!   development and JSON in containers
//! - **Metrics**: Prometheus counters in a process-wide registry, exported
//!   as text by [`encode_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use keyfold_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KF_SERVICE_NAME` | `keyfold` | Service name in log records |
//! | `KF_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `KF_JSON_LOGS` | `false` (true in containers) | JSON log lines |
//! | `KF_CONSOLE_OUTPUT` | `true` | Log to stdout |

#![warn(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, COMMANDS_DISPATCHED, COMMAND_DURATION,
    DECRYPTION_FAILURES, EVENTS_APPENDED, EVENTS_REPLAYED, SECRETS_EXPOSED, USERS_OPEN,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    tracing_setup::init_tracing(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
