//! # Container Registry
//!
//! Process-wide coordinator. Tracks the live set of containers, derives the
//! combined snapshot and fans it out to every registered plugin.
//!
//! ## Combination Pipeline
//!
//! ```text
//!  register / unregister
//!          │  (new container set, fresh per-container subscriptions)
//!          ▼
//!  ┌──────────────┐   topology    ┌────────────────────┐   snapshot   ┌─────────┐
//!  │ ContainerSet │ ────────────→ │ combine-all-latest │ ───────────→ │ plugins │
//!  └──────────────┘               └────────────────────┘              └─────────┘
//! ```
//!
//! Every set change discards the previous per-container subscriptions and
//! restarts combine-all-latest over the new members. Subscriptions are taken
//! synchronously in `register_container`/`unregister_container`, so no
//! mutation that happens after registration is missed. The pipeline runs on a
//! single Tokio task: plugin calls never overlap and never run inside
//! `mutate`.

use parking_lot::{Mutex, RwLock};
use statehub_telemetry::{
    metric_inc, CONTAINERS_REGISTERED, PLUGIN_FAILURES, SNAPSHOTS_DELIVERED, TOPOLOGY_REBUILDS,
};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::combine::CombineLatest;
use crate::domain::{CombinedSnapshot, ContainerId, RegistryError};
use crate::ports::{ObservableContainer, PluginPort, StateStream};

/// Set while a registry is live in this process.
static REGISTRY_LIVE: AtomicBool = AtomicBool::new(false);

type ContainerSet = Arc<BTreeMap<ContainerId, Arc<dyn ObservableContainer>>>;
type PluginList = Arc<RwLock<Vec<Arc<dyn PluginPort>>>>;

/// Subscriptions for one container set, tagged with the set's generation.
struct Topology {
    generation: u64,
    sources: Vec<(ContainerId, StateStream)>,
}

struct SetState {
    containers: ContainerSet,
    generation: u64,
}

/// The singleton registry.
///
/// Created once per process with [`ContainerRegistry::new`] and passed by
/// `Arc` to every container. A second live instance is rejected with
/// [`RegistryError::SingletonViolation`]; the slot is released by
/// [`teardown`](Self::teardown) or drop.
pub struct ContainerRegistry {
    set: Mutex<SetState>,
    plugins: PluginList,
    topology_tx: mpsc::UnboundedSender<Topology>,
    shutdown_tx: watch::Sender<bool>,
    pipeline: Mutex<Option<JoinHandle<()>>>,
    torn_down: AtomicBool,
}

impl ContainerRegistry {
    /// Create the registry and start its combination pipeline on the
    /// current Tokio runtime.
    pub fn new(plugins: Vec<Arc<dyn PluginPort>>) -> Result<Arc<Self>, RegistryError> {
        let runtime = Handle::try_current().map_err(|_| RegistryError::NoRuntime)?;

        if REGISTRY_LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            error!("Multiple instances of ContainerRegistry found");
            return Err(RegistryError::SingletonViolation);
        }

        let (topology_tx, topology_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let plugin_count = plugins.len();
        let plugins: PluginList = Arc::new(RwLock::new(plugins));

        let pipeline = runtime.spawn(run_pipeline(topology_rx, shutdown_rx, plugins.clone()));

        info!(plugins = plugin_count, "Container registry created");

        Ok(Arc::new(Self {
            set: Mutex::new(SetState {
                containers: Arc::new(BTreeMap::new()),
                generation: 0,
            }),
            plugins,
            topology_tx,
            shutdown_tx,
            pipeline: Mutex::new(Some(pipeline)),
            torn_down: AtomicBool::new(false),
        }))
    }

    /// Add a plugin. It receives every snapshot computed from now on.
    pub fn add_plugin(&self, plugin: Arc<dyn PluginPort>) {
        debug!(plugin = plugin.name(), "Plugin registered");
        self.plugins.write().push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.read().len()
    }

    /// Add a container to the tracked set.
    ///
    /// Fails with [`RegistryError::DuplicateIdentity`] if a container with
    /// the same ID is registered; the existing entry is kept. Destroyed
    /// containers are rejected with [`RegistryError::DestroyedContainer`].
    pub fn register_container(
        &self,
        container: Arc<dyn ObservableContainer>,
    ) -> Result<(), RegistryError> {
        if self.is_torn_down() {
            return Err(RegistryError::TornDown);
        }

        let id = container.container_id().clone();
        if container.is_destroyed() {
            warn!(container = %id, "Rejected registration of destroyed container");
            return Err(RegistryError::DestroyedContainer { id });
        }
        let (generation, containers) = {
            let mut set = self.set.lock();
            if set.containers.contains_key(&id) {
                warn!(container = %id, "Duplicate container instance ID");
                return Err(RegistryError::DuplicateIdentity { id });
            }
            let mut next = (*set.containers).clone();
            next.insert(id.clone(), container);
            set.containers = Arc::new(next);
            set.generation += 1;
            CONTAINERS_REGISTERED.set(set.containers.len() as f64);
            (set.generation, set.containers.clone())
        };

        debug!(container = %id, containers = containers.len(), "Container registered");
        self.publish_topology(generation, &containers);
        Ok(())
    }

    /// Remove a container by ID. Unknown IDs are ignored.
    pub fn unregister_container(&self, id: &ContainerId) {
        let (generation, containers) = {
            let mut set = self.set.lock();
            if !set.containers.contains_key(id) {
                debug!(container = %id, "Unregister ignored: container not registered");
                return;
            }
            let mut next = (*set.containers).clone();
            next.remove(id);
            set.containers = Arc::new(next);
            set.generation += 1;
            CONTAINERS_REGISTERED.set(set.containers.len() as f64);
            (set.generation, set.containers.clone())
        };

        debug!(container = %id, containers = containers.len(), "Container unregistered");
        self.publish_topology(generation, &containers);
    }

    /// Subscribe to every member of `containers` and hand the subscriptions
    /// to the pipeline.
    fn publish_topology(&self, generation: u64, containers: &ContainerSet) {
        let sources = containers
            .iter()
            .map(|(id, container)| (id.clone(), container.observe_state()))
            .collect();

        if self
            .topology_tx
            .send(Topology {
                generation,
                sources,
            })
            .is_err()
        {
            debug!(generation, "Combination pipeline stopped, topology dropped");
        }
    }

    /// IDs of the registered containers, in ID order.
    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.set.lock().containers.keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.set.lock().containers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.set.lock().containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.lock().containers.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Stop the pipeline, release every subscription, plugin and the
    /// singleton slot.
    ///
    /// Containers are not destroyed; their owners keep them. Later calls are
    /// no-ops.
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        let _ = self.shutdown_tx.send(true);
        self.set.lock().containers = Arc::new(BTreeMap::new());
        self.plugins.write().clear();
        CONTAINERS_REGISTERED.set(0.0);
        REGISTRY_LIVE.store(false, Ordering::SeqCst);

        info!("Container registry torn down");
    }

    /// Tear down and wait for the pipeline task to finish.
    pub async fn shutdown(&self) {
        self.teardown();
        let pipeline = self.pipeline.lock().take();
        if let Some(pipeline) = pipeline {
            if let Err(e) = pipeline.await {
                warn!(error = %e, "Combination pipeline ended abnormally");
            }
        }
    }
}

impl Drop for ContainerRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run_pipeline(
    mut topology_rx: mpsc::UnboundedReceiver<Topology>,
    mut shutdown_rx: watch::Receiver<bool>,
    plugins: PluginList,
) {
    let mut generation = 0;
    let mut combined: Option<CombineLatest> = None;

    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
                debug!("Combination pipeline shutting down");
                return;
            }

            topology = topology_rx.recv() => {
                let Some(mut topology) = topology else {
                    return;
                };
                // Only the newest set matters
                while let Ok(newer) = topology_rx.try_recv() {
                    if newer.generation > topology.generation {
                        topology = newer;
                    }
                }
                if topology.generation <= generation {
                    continue;
                }
                generation = topology.generation;

                metric_inc!(TOPOLOGY_REBUILDS);
                debug!(
                    generation,
                    containers = topology.sources.len(),
                    "Rebuilding combination pipeline"
                );
                combined = if topology.sources.is_empty() {
                    None
                } else {
                    Some(CombineLatest::new(topology.sources))
                };
            }

            snapshot = next_snapshot(&mut combined) => match snapshot {
                Some(snapshot) => dispatch(&plugins, &snapshot),
                None => combined = None,
            },
        }
    }
}

async fn next_snapshot(combined: &mut Option<CombineLatest>) -> Option<CombinedSnapshot> {
    match combined {
        Some(combined) => combined.next_snapshot().await,
        None => std::future::pending().await,
    }
}

/// Deliver one snapshot to every plugin, isolating failures per plugin.
fn dispatch(plugins: &PluginList, snapshot: &CombinedSnapshot) {
    let plugins: Vec<Arc<dyn PluginPort>> = plugins.read().clone();
    metric_inc!(SNAPSHOTS_DELIVERED);

    for plugin in &plugins {
        match panic::catch_unwind(AssertUnwindSafe(|| plugin.notify(snapshot))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metric_inc!(PLUGIN_FAILURES, &["error"]);
                warn!(plugin = plugin.name(), error = %e, "Plugin failed to handle snapshot");
            }
            Err(_) => {
                metric_inc!(PLUGIN_FAILURES, &["panic"]);
                error!(plugin = plugin.name(), "Plugin panicked while handling snapshot");
            }
        }
    }
}
