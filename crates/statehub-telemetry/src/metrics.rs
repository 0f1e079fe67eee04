//! Prometheus metrics for StateHub.
//!
//! All metrics follow the naming convention: `statehub_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Dedicated metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Containers currently registered with the registry
    pub static ref CONTAINERS_REGISTERED: Gauge = Gauge::new(
        "statehub_containers_registered",
        "Number of containers currently registered"
    ).expect("metric creation failed");

    /// Mutations applied across all containers
    pub static ref MUTATIONS_APPLIED: Counter = Counter::new(
        "statehub_mutations_applied_total",
        "Total number of state mutations applied"
    ).expect("metric creation failed");

    /// Combined snapshots handed to the plugin fan-out
    pub static ref SNAPSHOTS_DELIVERED: Counter = Counter::new(
        "statehub_snapshots_delivered_total",
        "Total number of combined snapshots delivered to plugins"
    ).expect("metric creation failed");

    /// Plugin delivery failures
    pub static ref PLUGIN_FAILURES: CounterVec = CounterVec::new(
        Opts::new("statehub_plugin_failures_total", "Plugin notify failures"),
        &["kind"]  // kind: error/panic
    ).expect("metric creation failed");

    /// Combination pipeline restarts caused by container set changes
    pub static ref TOPOLOGY_REBUILDS: Counter = Counter::new(
        "statehub_topology_rebuilds_total",
        "Total number of combination pipeline rebuilds"
    ).expect("metric creation failed");
}

/// Handle to the registered metrics.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, TelemetryError> {
        encode(&self.registry)
    }
}

/// Register all metrics with the dedicated registry.
///
/// Registering twice is tolerated: the already-registered collectors keep
/// reporting into the same registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CONTAINERS_REGISTERED.clone()),
        Box::new(MUTATIONS_APPLIED.clone()),
        Box::new(SNAPSHOTS_DELIVERED.clone()),
        Box::new(PLUGIN_FAILURES.clone()),
        Box::new(TOPOLOGY_REBUILDS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode(&REGISTRY)
}

fn encode(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
