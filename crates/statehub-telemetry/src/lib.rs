//! # StateHub Telemetry
//!
//! Structured logging and Prometheus metrics for StateHub hosts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use statehub_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//!
//!     // Containers and the registry now log and record metrics
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STATEHUB_SERVICE_NAME` | `statehub` | Service name attached to logs |
//! | `STATEHUB_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `STATEHUB_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |
//! | `STATEHUB_JSON_LOGS` | `false` | JSON formatted logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, CONTAINERS_REGISTERED, MUTATIONS_APPLIED,
    PLUGIN_FAILURES, SNAPSHOTS_DELIVERED, TOPOLOGY_REBUILDS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics together.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so that anything logged during startup is also counted
    let metrics = register_metrics()?;
    let logging = init_logging(config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    /// Handle to the metrics registry.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Increment a metric, optionally with label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
