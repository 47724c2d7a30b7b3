//! Queue lookup benchmarks
//!
//! Compares the locked self-access path with the unlocked peer path and a
//! direct registry lookup, across registry sizes.

use actor_registry::{Actor, QueueRegistry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn populated(size: usize) -> (Arc<QueueRegistry<u64>>, Vec<Actor<u64>>) {
    let queues = Arc::new(QueueRegistry::new());
    let actors = (0..size)
        .map(|i| Actor::new(format!("actor-{}", i), Arc::clone(&queues)).unwrap())
        .collect();
    (queues, actors)
}

fn bench_lookup_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_lookup");

    for size in [8usize, 64, 512] {
        let (queues, actors) = populated(size);
        let me = &actors[0];
        let peer = format!("ACTOR-{}", size - 1);

        group.bench_with_input(BenchmarkId::new("self_locked", size), &size, |b, _| {
            b.iter(|| black_box(me.get_queue("actor-0")))
        });

        group.bench_with_input(BenchmarkId::new("peer_unlocked", size), &size, |b, _| {
            b.iter(|| black_box(me.get_queue(&peer)))
        });

        group.bench_with_input(BenchmarkId::new("registry_direct", size), &size, |b, _| {
            b.iter(|| black_box(queues.get_queue(&peer)))
        });
    }

    group.finish();
}

fn bench_send_receive(c: &mut Criterion) {
    let (_queues, actors) = populated(2);
    let (sender, receiver) = (&actors[0], &actors[1]);

    c.bench_function("send_receive_roundtrip", |b| {
        b.iter(|| {
            sender.send("actor-1", black_box(42)).unwrap();
            black_box(receiver.receive())
        })
    });
}

criterion_group!(benches, bench_lookup_paths, bench_send_receive);
criterion_main!(benches);
