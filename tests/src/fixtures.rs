//! Shared fixtures for the integration scenarios.

use parking_lot::{const_mutex, Mutex, MutexGuard};
use serde::Serialize;
use statehub_core::{CombinedSnapshot, ContainerState, PluginError, PluginPort, StateRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

static REGISTRY_LOCK: Mutex<()> = const_mutex(());

/// Only one registry may be live per process; scenarios take this first.
pub fn registry_lock() -> MutexGuard<'static, ()> {
    REGISTRY_LOCK.lock()
}

pub type Snapshots = UnboundedReceiverStream<CombinedSnapshot>;

/// Next snapshot, failing the test after 500ms.
pub async fn next_snapshot(snapshots: &mut Snapshots) -> CombinedSnapshot {
    timeout(Duration::from_millis(500), snapshots.next())
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot stream ended")
}

/// Assert that no snapshot arrives within 50ms.
pub async fn assert_no_snapshot(snapshots: &mut Snapshots) {
    let outcome = timeout(Duration::from_millis(50), snapshots.next()).await;
    assert!(outcome.is_err(), "unexpected snapshot: {:?}", outcome);
}

/// `{ "count": n }`
pub fn count(n: i64) -> StateRecord {
    StateRecord::new().with("count", n)
}

/// Patch incrementing `count` by one.
pub fn increment(state: &StateRecord) -> StateRecord {
    count(state.get_i64("count").unwrap_or(0) + 1)
}

/// Typed state shape with a struct patch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<String>,
    pub visits: u32,
}

#[derive(Debug, Default)]
pub struct SessionPatch {
    pub user: Option<Option<String>>,
    pub visits: Option<u32>,
}

impl ContainerState for Session {
    type Patch = SessionPatch;

    fn merge(&self, patch: SessionPatch) -> Self {
        Self {
            user: patch.user.unwrap_or_else(|| self.user.clone()),
            visits: patch.visits.unwrap_or(self.visits),
        }
    }
}

/// Plugin that always reports an error.
#[derive(Default)]
pub struct FailingPlugin {
    pub calls: AtomicUsize,
}

impl PluginPort for FailingPlugin {
    fn notify(&self, _snapshot: &CombinedSnapshot) -> Result<(), PluginError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PluginError::Rejected("failing plugin".to_string()))
    }
}

/// Plugin that always panics.
pub struct PanickingPlugin;

impl PluginPort for PanickingPlugin {
    fn notify(&self, _snapshot: &CombinedSnapshot) -> Result<(), PluginError> {
        panic!("panicking plugin");
    }
}
