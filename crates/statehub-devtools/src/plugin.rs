//! Devtools plugin: forwards combined snapshots to a devtools host.

use statehub_core::{CombinedSnapshot, PluginError, PluginPort};
use std::sync::Arc;
use tracing::{debug, info};

use crate::bridge::{ConnectionMetadata, DevtoolsBridge, DevtoolsConnection};
use crate::config::DevtoolsConfig;

/// Plugin that sends every snapshot to a devtools host.
///
/// Connects once at construction. Without a bridge (no host available) the
/// plugin stays inactive and `notify` is a silent no-op.
pub struct DevtoolsPlugin {
    config: DevtoolsConfig,
    connection: Option<Box<dyn DevtoolsConnection>>,
}

impl DevtoolsPlugin {
    pub fn new(config: DevtoolsConfig, bridge: Option<Arc<dyn DevtoolsBridge>>) -> Self {
        let connection = match bridge {
            Some(bridge) => {
                let metadata = ConnectionMetadata {
                    name: config.name.clone(),
                };
                info!(name = %metadata.name, "Connecting to devtools host");
                Some(bridge.connect(&metadata))
            }
            None => {
                debug!("No devtools host available, plugin inactive");
                None
            }
        };

        Self { config, connection }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn config(&self) -> &DevtoolsConfig {
        &self.config
    }
}

impl PluginPort for DevtoolsPlugin {
    fn notify(&self, snapshot: &CombinedSnapshot) -> Result<(), PluginError> {
        if !self.config.enabled {
            return Ok(());
        }
        if let Some(connection) = &self.connection {
            connection.send(&self.config.action_label, &snapshot.to_json());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "devtools"
    }
}
