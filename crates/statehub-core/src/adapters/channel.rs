//! Channel plugin adapter.
//!
//! Forwards every combined snapshot into a Tokio channel so that async code
//! (tests, UIs, bridges running on their own task) can consume snapshots as a
//! stream.

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::domain::{CombinedSnapshot, PluginError};
use crate::ports::PluginPort;

/// Plugin that forwards snapshots to an unbounded channel.
pub struct ChannelPlugin {
    sender: mpsc::UnboundedSender<CombinedSnapshot>,
}

impl ChannelPlugin {
    /// Create the plugin and the stream its snapshots arrive on.
    pub fn new() -> (Self, UnboundedReceiverStream<CombinedSnapshot>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, UnboundedReceiverStream::new(receiver))
    }
}

impl PluginPort for ChannelPlugin {
    fn notify(&self, snapshot: &CombinedSnapshot) -> Result<(), PluginError> {
        self.sender
            .send(snapshot.clone())
            .map_err(|_| PluginError::Unavailable("snapshot receiver dropped".to_string()))
    }

    fn name(&self) -> &str {
        "channel"
    }
}
