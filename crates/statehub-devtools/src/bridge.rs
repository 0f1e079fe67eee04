//! Host-provided devtools bridge.
//!
//! The host environment may expose a debugging extension. Connecting to it
//! yields a connection that accepts `(label, state)` pairs.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Metadata announced when connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionMetadata {
    pub name: String,
}

/// An open connection to a devtools host.
pub trait DevtoolsConnection: Send + Sync {
    fn send(&self, label: &str, state: &Value);
}

/// A devtools host that connections can be opened against.
pub trait DevtoolsBridge: Send + Sync {
    fn connect(&self, metadata: &ConnectionMetadata) -> Box<dyn DevtoolsConnection>;
}

/// Bridge that reports every state update as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBridge;

struct TracingConnection {
    name: String,
}

impl DevtoolsBridge for TracingBridge {
    fn connect(&self, metadata: &ConnectionMetadata) -> Box<dyn DevtoolsConnection> {
        info!(target: "statehub::devtools", instance = %metadata.name, "Devtools connected");
        Box::new(TracingConnection {
            name: metadata.name.clone(),
        })
    }
}

impl DevtoolsConnection for TracingConnection {
    fn send(&self, label: &str, state: &Value) {
        info!(
            target: "statehub::devtools",
            instance = %self.name,
            action = label,
            state = %state,
            "State update"
        );
    }
}
