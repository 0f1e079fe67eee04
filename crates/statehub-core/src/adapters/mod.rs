//! Plugin adapters shipped with the core.

pub mod channel;

pub use channel::ChannelPlugin;
