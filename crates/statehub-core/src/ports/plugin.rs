//! Plugin port.
//!
//! Implemented by external observers (devtools bridges, loggers, history
//! recorders). The core never implements concrete plugins beyond test and
//! channel adapters.

use crate::domain::{CombinedSnapshot, PluginError};

/// Receiver of combined snapshots.
///
/// The registry calls `notify` once per recomputed snapshot, from a single
/// delivery task, so calls for one registry never overlap. Returned errors
/// and panics are logged and counted by the registry; they do not stop
/// delivery to other plugins and are not retried.
pub trait PluginPort: Send + Sync {
    /// Handle a new combined snapshot.
    fn notify(&self, snapshot: &CombinedSnapshot) -> Result<(), PluginError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
