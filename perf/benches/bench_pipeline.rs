use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use station_core::{Counters, TelemetryStore};
use station_engine::{Broadcaster, FeedPayload, Ingestor};
use station_icc::Fanout;
use station_perf::downlink_stream;

fn bench_ingest(c: &mut Criterion) {
    let bytes = downlink_stream(1_000, 50);
    let mut ingestor = Ingestor::new(Arc::new(TelemetryStore::new()), Arc::new(Counters::new()));

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("ingest_1000_frames", |b| {
        b.iter(|| ingestor.feed(black_box(&bytes)));
    });
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let store = Arc::new(TelemetryStore::new());
    let counters = Arc::new(Counters::new());
    let mut ingestor = Ingestor::new(store.clone(), counters.clone());
    ingestor.feed(&downlink_stream(10, 0));

    let fanout: Arc<Fanout<FeedPayload>> = Arc::new(Fanout::new(16));
    let sub = fanout.subscribe();
    let broadcaster = Broadcaster::new(store, counters, fanout, Duration::from_millis(50));

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));
    group.bench_function("broadcast_tick", |b| {
        b.iter(|| {
            black_box(broadcaster.tick().ok());
            let _ = sub.try_recv();
        });
    });
    group.finish();
}

criterion_group!(benches, bench_ingest, bench_tick);
criterion_main!(benches);
