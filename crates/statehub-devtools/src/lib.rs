//! # StateHub Devtools
//!
//! A [`PluginPort`](statehub_core::PluginPort) that forwards every combined
//! snapshot to a debugging host, in the style of the Redux devtools
//! extension: connect once with an instance name, then `send(label, state)`
//! per snapshot.
//!
//! The host is optional. When none is available the plugin degrades to a
//! silent no-op.
//!
//! ```rust,ignore
//! let devtools = DevtoolsPlugin::new(DevtoolsConfig::from_env()?, Some(Arc::new(TracingBridge)));
//! let registry = ContainerRegistry::new(vec![Arc::new(devtools)])?;
//! ```

pub mod bridge;
pub mod config;
pub mod plugin;

pub use bridge::{ConnectionMetadata, DevtoolsBridge, DevtoolsConnection, TracingBridge};
pub use config::{default_instance_name, DevtoolsConfig, DEFAULT_ACTION_LABEL};
pub use plugin::DevtoolsPlugin;

use thiserror::Error;

/// Devtools configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DevtoolsError {
    #[error("Invalid value {value:?} for {variable}, expected true/false")]
    InvalidFlag { variable: String, value: String },

    #[error("Invalid devtools configuration: {0}")]
    Parse(String),
}
