use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ltm_codec::{FrameSink, FrameSync, SyncError};
use ltm_events::RawFrame;
use station_perf::downlink_stream;

/// Counts without storing, so the bench measures the state machine only.
#[derive(Default)]
struct CountingSink {
    frames: u64,
    errors: u64,
}

impl FrameSink for CountingSink {
    fn on_frame(&mut self, frame: RawFrame) {
        black_box(frame);
        self.frames += 1;
    }

    fn on_error(&mut self, error: SyncError) {
        black_box(error);
        self.errors += 1;
    }
}

fn bench_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sync");

    for (label, noise) in [("clean", 0usize), ("noisy_1_in_10", 10)] {
        let bytes = downlink_stream(1_000, noise);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("feed", label), &bytes, |b, bytes| {
            let mut sync = FrameSync::new();
            let mut sink = CountingSink::default();
            b.iter(|| sync.feed(black_box(bytes), &mut sink));
        });
    }

    group.finish();
}

fn bench_push_vs_feed(c: &mut Criterion) {
    let bytes = downlink_stream(1_000, 0);
    let mut group = c.benchmark_group("frame_sync");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("push_per_byte", |b| {
        let mut sync = FrameSync::new();
        b.iter(|| {
            for &byte in black_box(&bytes) {
                black_box(sync.push(byte));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_feed, bench_push_vs_feed);
criterion_main!(benches);
