//! # StateHub Core
//!
//! Reactive state containers composed by a single registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  register/unregister  ┌───────────────────┐  notify   ┌────────────┐
//! │ StateContainer │ ────────────────────→ │ ContainerRegistry │ ────────→ │ PluginPort │
//! │  (one state)   │ ←──── observe ─────── │ (combine-latest)  │           │ (devtools) │
//! └────────────────┘                       └───────────────────┘           └────────────┘
//! ```
//!
//! - **StateContainer:** owns one typed state value. Mutations are serialized
//!   and shallow-merged; observations replay the current value and skip
//!   unchanged projections.
//! - **ContainerRegistry:** process-wide singleton. Tracks the live container
//!   set, recomputes the combined snapshot whenever the set or any member
//!   changes, and fans it out to plugins.
//! - **PluginPort:** external observer of combined snapshots.
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement |
//! |-----------|-------------|
//! | Unique container IDs | `ContainerRegistry::register_container` |
//! | One live registry per process | `ContainerRegistry::new` |
//! | In-order, per-subscriber delivery | `latest::LatestValue` queues |
//! | No delivery inside `mutate` | per-subscriber queues + pipeline task |
//! | Plugin failures isolated | `registry::dispatch` |
//!
//! ## Module Structure
//!
//! ```text
//! domain/     - ContainerId, ContainerState, StateRecord, CombinedSnapshot, errors
//! ports/      - PluginPort, ObservableContainer
//! adapters/   - ChannelPlugin
//! latest.rs   - latest-value holder with replay
//! selection.rs- deduplicated projections
//! combine.rs  - combine-all-latest
//! container.rs- StateContainer
//! registry.rs - ContainerRegistry and its pipeline
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
mod combine;
pub mod container;
pub mod domain;
pub mod latest;
pub mod ports;
pub mod registry;
pub mod selection;

pub use adapters::ChannelPlugin;
pub use container::StateContainer;
pub use domain::{
    CombinedSnapshot, ContainerError, ContainerId, ContainerState, PluginError, RegistryError,
    StateRecord,
};
pub use latest::{LatestValue, Subscription};
pub use ports::{ObservableContainer, PluginPort, StateStream};
pub use registry::ContainerRegistry;
pub use selection::Selection;
