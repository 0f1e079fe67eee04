//! Devtools plugin configuration.

use serde::{Deserialize, Serialize};
use std::env;

use crate::DevtoolsError;

/// Action label sent with every state update. Snapshots carry no per-mutation
/// label, so every update is reported under the same name.
pub const DEFAULT_ACTION_LABEL: &str = "NO_NAME";

/// Instance name announced to the devtools host.
pub fn default_instance_name() -> String {
    format!("StateHub {}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for the devtools plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevtoolsConfig {
    /// Forward snapshots to the host (default: true)
    pub enabled: bool,

    /// Instance name announced on connect
    pub name: String,

    /// Label sent alongside each state
    pub action_label: String,
}

impl Default for DevtoolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_instance_name(),
            action_label: DEFAULT_ACTION_LABEL.to_string(),
        }
    }
}

impl DevtoolsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `STATEHUB_DEVTOOLS_ENABLED`: `true/false`, `1/0` (default: true)
    /// - `STATEHUB_DEVTOOLS_NAME`: instance name (default: `StateHub <version>`)
    pub fn from_env() -> Result<Self, DevtoolsError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("STATEHUB_DEVTOOLS_ENABLED") {
            config.enabled = parse_flag(&value).ok_or_else(|| DevtoolsError::InvalidFlag {
                variable: "STATEHUB_DEVTOOLS_ENABLED".to_string(),
                value,
            })?;
        }
        if let Ok(name) = env::var("STATEHUB_DEVTOOLS_NAME") {
            config.name = name;
        }

        Ok(config)
    }

    /// Parse configuration from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DevtoolsError> {
        serde_json::from_str(json).map_err(|e| DevtoolsError::Parse(e.to_string()))
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
