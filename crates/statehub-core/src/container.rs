//! # State Container
//!
//! Owns one typed state value. The value is only changed through
//! [`StateContainer::mutate`], which serializes updates and merges partial
//! patches into a new value, and is observed through
//! [`StateContainer::observe`], which replays the current value and
//! deduplicates projections.
//!
//! ```rust,ignore
//! let registry = ContainerRegistry::new(vec![])?;
//! let counter = StateContainer::new(&registry, StateRecord::new().with("count", 0))?;
//!
//! let mut count = counter.observe(|s| s.get_i64("count"));
//! counter.mutate(|s| StateRecord::new().with("count", s.get_i64("count").unwrap_or(0) + 1))?;
//!
//! assert_eq!(count.recv().await, Some(Some(0)));
//! assert_eq!(count.recv().await, Some(Some(1)));
//! ```

use futures::StreamExt;
use serde_json::Value;
use statehub_telemetry::{metric_inc, MUTATIONS_APPLIED};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::domain::{ContainerError, ContainerId, ContainerState, RegistryError};
use crate::latest::LatestValue;
use crate::ports::{ObservableContainer, StateStream};
use crate::registry::ContainerRegistry;
use crate::selection::Selection;

/// Shared part of a container, also held by the registry while registered.
pub(crate) struct ContainerCore<S> {
    id: ContainerId,
    state: LatestValue<S>,
}

impl<S: ContainerState> ObservableContainer for ContainerCore<S> {
    fn container_id(&self) -> &ContainerId {
        &self.id
    }

    fn observe_state(&self) -> StateStream {
        let id = self.id.clone();
        Selection::new(self.state.subscribe(), S::clone)
            .map(move |state| {
                serde_json::to_value(&state).unwrap_or_else(|e| {
                    warn!(container = %id, error = %e, "State is not representable as JSON");
                    Value::Null
                })
            })
            .boxed()
    }

    fn is_destroyed(&self) -> bool {
        self.state.is_closed()
    }
}

/// A unit owning one state value with controlled mutation and observation.
///
/// Dropping the container destroys it.
pub struct StateContainer<S: ContainerState> {
    core: Arc<ContainerCore<S>>,
    registry: Option<Arc<ContainerRegistry>>,
}

impl<S: ContainerState> StateContainer<S> {
    /// Create a container with a generated `<type-name>@<n>` ID and register
    /// it with `registry`.
    pub fn new(registry: &Arc<ContainerRegistry>, initial: S) -> Result<Self, RegistryError> {
        Self::build(Some(registry), ContainerId::for_type::<S>(), initial)
    }

    /// Create a container with a custom ID and register it with `registry`.
    ///
    /// Fails with [`RegistryError::DuplicateIdentity`] if the ID is taken.
    pub fn with_id(
        registry: &Arc<ContainerRegistry>,
        id: impl Into<ContainerId>,
        initial: S,
    ) -> Result<Self, RegistryError> {
        Self::build(Some(registry), id.into(), initial)
    }

    /// Create a container that is not tracked by any registry.
    pub fn detached(initial: S) -> Self {
        Self::detached_with_id(ContainerId::for_type::<S>(), initial)
    }

    pub fn detached_with_id(id: impl Into<ContainerId>, initial: S) -> Self {
        Self {
            core: Arc::new(ContainerCore {
                id: id.into(),
                state: LatestValue::new(initial),
            }),
            registry: None,
        }
    }

    fn build(
        registry: Option<&Arc<ContainerRegistry>>,
        id: ContainerId,
        initial: S,
    ) -> Result<Self, RegistryError> {
        let core = Arc::new(ContainerCore {
            id,
            state: LatestValue::new(initial),
        });

        if let Some(registry) = registry {
            registry.register_container(core.clone())?;
        }
        debug!(container = %core.id, "Container created");

        Ok(Self {
            core,
            registry: registry.cloned(),
        })
    }

    pub fn id(&self) -> &ContainerId {
        &self.core.id
    }

    /// Clone of the current state.
    pub fn state(&self) -> S {
        self.core.state.get()
    }

    /// Apply a partial update computed from the current state.
    ///
    /// Concurrent calls are applied one at a time, each against the state
    /// left by the previous one. Observers are not called from here; they
    /// receive the new value on their own task turn. `update` must not call
    /// back into this container.
    ///
    /// Fails with [`ContainerError::Destroyed`] after [`destroy`](Self::destroy).
    pub fn mutate<F>(&self, update: F) -> Result<(), ContainerError>
    where
        F: FnOnce(&S) -> S::Patch,
    {
        let applied = self
            .core
            .state
            .update(|current| current.merge(update(current)));

        match applied {
            Ok(()) => {
                metric_inc!(MUTATIONS_APPLIED);
                trace!(container = %self.core.id, "Mutation applied");
                Ok(())
            }
            Err(_) => {
                warn!(container = %self.core.id, "Mutation rejected: container destroyed");
                Err(ContainerError::Destroyed {
                    id: self.core.id.clone(),
                })
            }
        }
    }

    /// Observe a projection of the state. See [`Selection`].
    pub fn observe<K, F>(&self, selector: F) -> Selection<S, K>
    where
        K: PartialEq + Clone,
        F: Fn(&S) -> K + Send + 'static,
    {
        Selection::new(self.core.state.subscribe(), selector)
    }

    /// Type-erased handle for manual registration.
    ///
    /// Containers built with [`new`](Self::new) or [`with_id`](Self::with_id)
    /// register themselves; a manually registered handle must also be
    /// unregistered by the caller.
    pub fn handle(&self) -> Arc<dyn ObservableContainer> {
        self.core.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.core.state.is_closed()
    }

    /// Close the mutation channel, complete all observation streams and
    /// unregister from the registry. Later calls are no-ops.
    pub fn destroy(&self) {
        if !self.core.state.close() {
            return;
        }
        if let Some(registry) = &self.registry {
            registry.unregister_container(&self.core.id);
        }
        debug!(container = %self.core.id, "Container destroyed");
    }
}

impl<S: ContainerState> Drop for StateContainer<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
