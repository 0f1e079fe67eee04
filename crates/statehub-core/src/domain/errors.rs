//! Error types for containers, the registry and plugins.

use thiserror::Error;

use super::ids::ContainerId;

/// Registry errors.
///
/// `DuplicateIdentity` and `SingletonViolation` are programming errors: they
/// are surfaced immediately and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another container already registered under the same instance ID.
    #[error(
        "Container with duplicate instance ID found: {id} is already registered, \
         choose a different container ID"
    )]
    DuplicateIdentity { id: ContainerId },

    /// The container was destroyed before registration.
    #[error("Container {id} has been destroyed and cannot be registered")]
    DestroyedContainer { id: ContainerId },

    /// A second registry was constructed while one is still live.
    #[error("Multiple instances of ContainerRegistry found")]
    SingletonViolation,

    /// The registry was constructed outside a Tokio runtime.
    #[error("ContainerRegistry must be created inside a Tokio runtime")]
    NoRuntime,

    /// The registry has been torn down.
    #[error("ContainerRegistry has been torn down")]
    TornDown,
}

/// Container errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Mutation requested after `destroy()`.
    #[error("Container {id} has been destroyed")]
    Destroyed { id: ContainerId },
}

/// Errors a plugin may report from `notify`.
///
/// The registry logs and counts them; they never reach other plugins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The plugin could not handle this snapshot.
    #[error("Plugin rejected snapshot: {0}")]
    Rejected(String),

    /// The plugin's downstream sink is gone.
    #[error("Plugin unavailable: {0}")]
    Unavailable(String),
}
