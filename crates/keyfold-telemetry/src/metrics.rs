//! Prometheus metrics for the vault.
//!
//! All metrics follow the naming convention: `kf_<area>_<metric>_<unit>`
//!
//! Labels never carry user ids, account ids or anything derived from
//! secret content.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // COMMAND DISPATCH (Subsystem 6)
    // =========================================================================

    /// Commands dispatched, by command name and outcome
    pub static ref COMMANDS_DISPATCHED: IntCounterVec = IntCounterVec::new(
        Opts::new("kf_dispatch_commands_total", "Commands dispatched"),
        &["command", "outcome"]  // outcome: ok/rejected/failed
    ).expect("metric creation failed");

    /// Command duration, decode through projection
    pub static ref COMMAND_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "kf_dispatch_command_duration_seconds",
            "Time spent dispatching a command"
        ).buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0])
    ).expect("metric creation failed");

    /// Secrets exposed, by usage type
    pub static ref SECRETS_EXPOSED: IntCounterVec = IntCounterVec::new(
        Opts::new("kf_dispatch_secrets_exposed_total", "Secret exposures"),
        &["type"]  // password_exposed/keylist_key_exposed/ssh_signing/otp_export
    ).expect("metric creation failed");

    /// Exposures that failed to decrypt or were refused by the key material
    pub static ref DECRYPTION_FAILURES: IntCounter = IntCounter::new(
        "kf_dispatch_decryption_failures_total",
        "Exposure attempts refused by the key material"
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT LOG (Subsystem 3)
    // =========================================================================

    /// Events appended across all users
    pub static ref EVENTS_APPENDED: IntCounter = IntCounter::new(
        "kf_log_events_appended_total",
        "Events appended to user logs"
    ).expect("metric creation failed");

    /// Events replayed at startup
    pub static ref EVENTS_REPLAYED: IntCounter = IntCounter::new(
        "kf_log_events_replayed_total",
        "Events replayed while opening user logs"
    ).expect("metric creation failed");

    /// Users with an open log
    pub static ref USERS_OPEN: IntGauge = IntGauge::new(
        "kf_log_users_open",
        "Number of users with an open event log"
    ).expect("metric creation failed");
}

/// Register every metric with [`REGISTRY`].
///
/// Safe to call more than once; later calls find the metrics registered.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Dispatch
        Box::new(COMMANDS_DISPATCHED.clone()),
        Box::new(COMMAND_DURATION.clone()),
        Box::new(SECRETS_EXPOSED.clone()),
        Box::new(DECRYPTION_FAILURES.clone()),
        // Log
        Box::new(EVENTS_APPENDED.clone()),
        Box::new(EVENTS_REPLAYED.clone()),
        Box::new(USERS_OPEN.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
