//! # StateHub Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | StateContainer | `mutate` with N live observers |
//! | StateRecord | shallow merge |
//! | CombinedSnapshot | JSON rendering for plugins |
//! | ContainerRegistry | mutation to plugin delivery |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::{FutureExt, StreamExt};
use serde_json::json;
use statehub_core::{
    ChannelPlugin, CombinedSnapshot, ContainerId, ContainerRegistry, ContainerState,
    StateContainer, StateRecord,
};
use std::sync::Arc;
use std::time::Duration;

fn count(n: i64) -> StateRecord {
    StateRecord::new().with("count", n)
}

fn increment(state: &StateRecord) -> StateRecord {
    count(state.get_i64("count").unwrap_or(0) + 1)
}

// ============================================================================
// StateContainer
// ============================================================================

fn bench_mutate_with_observers(c: &mut Criterion) {
    let mut group = c.benchmark_group("container-mutate");

    for observers in [0usize, 1, 10, 100] {
        let container = StateContainer::detached(count(0));
        let mut selections: Vec<_> = (0..observers)
            .map(|_| container.observe(|s| s.get_i64("count")))
            .collect();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("mutate", observers),
            &observers,
            |b, _| {
                b.iter(|| {
                    container.mutate(increment).ok();
                    // Drain so queues stay bounded across iterations
                    for selection in selections.iter_mut() {
                        black_box(selection.next().now_or_never());
                    }
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// StateRecord
// ============================================================================

fn bench_record_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("record-merge");

    for fields in [4usize, 32, 256] {
        let record: StateRecord = (0..fields)
            .map(|i| (format!("field_{}", i), json!(i)))
            .collect();
        let patch = StateRecord::new().with("field_0", "patched");

        group.bench_with_input(BenchmarkId::new("merge", fields), &record, |b, record| {
            b.iter(|| black_box(record.merge(patch.clone())))
        });
    }

    group.finish();
}

// ============================================================================
// CombinedSnapshot
// ============================================================================

fn bench_snapshot_to_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot-json");

    for containers in [1usize, 16, 128] {
        let snapshot: CombinedSnapshot = (0..containers)
            .map(|i| {
                (
                    ContainerId::new(format!("Container@{}", i)),
                    json!({ "count": i, "label": "bench" }),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(containers as u64));
        group.bench_with_input(
            BenchmarkId::new("to_json", containers),
            &snapshot,
            |b, snapshot| b.iter(|| black_box(snapshot.to_json())),
        );
    }

    group.finish();
}

// ============================================================================
// ContainerRegistry
// ============================================================================

fn bench_registry_delivery(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry-delivery");
    group.measurement_time(Duration::from_secs(5));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => panic!("failed to build runtime: {}", e),
    };

    let (plugin, mut snapshots) = ChannelPlugin::new();
    let (registry, container) = runtime.block_on(async {
        let registry = ContainerRegistry::new(vec![Arc::new(plugin)]).unwrap();
        let container = StateContainer::with_id(&registry, "bench", count(0)).unwrap();
        (registry, container)
    });
    // Registration replay
    runtime.block_on(snapshots.next());

    group.bench_function("mutate_to_plugin", |b| {
        b.iter(|| {
            runtime.block_on(async {
                container.mutate(increment).ok();
                black_box(snapshots.next().await)
            })
        })
    });

    group.finish();

    drop(container);
    runtime.block_on(registry.shutdown());
}

criterion_group!(
    benches,
    bench_mutate_with_observers,
    bench_record_merge,
    bench_snapshot_to_json,
    bench_registry_delivery
);
criterion_main!(benches);
