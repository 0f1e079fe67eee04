//! Ports: the plugin interface the registry drives, and the type-erased
//! container interface the registry observes.

pub mod observable;
pub mod plugin;

pub use observable::{ObservableContainer, StateStream};
pub use plugin::PluginPort;
