//! Type-erased container port.
//!
//! The registry tracks containers of arbitrary state types; it only needs an
//! ID and a stream of serialized full-state values.

use futures::stream::BoxStream;
use serde_json::Value;

use crate::domain::ContainerId;

/// Deduplicated stream of a container's full state, serialized to JSON.
pub type StateStream = BoxStream<'static, Value>;

/// A container as seen by the registry.
pub trait ObservableContainer: Send + Sync {
    fn container_id(&self) -> &ContainerId;

    /// Subscribe to the identity projection of the container's state.
    ///
    /// Must replay the current state as the first item.
    fn observe_state(&self) -> StateStream;

    /// A destroyed container never produces a state and cannot be registered.
    fn is_destroyed(&self) -> bool;
}
