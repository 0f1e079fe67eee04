//! Domain types: identity, state shapes, snapshots and errors.

pub mod errors;
pub mod ids;
pub mod snapshot;
pub mod state;

pub use errors::{ContainerError, PluginError, RegistryError};
pub use ids::{short_type_name, ContainerId};
pub use snapshot::CombinedSnapshot;
pub use state::{ContainerState, StateRecord};
