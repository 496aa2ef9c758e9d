//! Integration benchmark for the advertisement processing pipeline.
//!
//! Benchmarks the full application loop using the same patterns as the
//! tests in app.rs - with a FakeSource feeding raw frames through run_with_io.

use ble_advertiser_listener::app::{FrameSource, Options, run_with_io};
use ble_advertiser_listener::input::FrameResult;
use ble_advertiser_listener::{DecimalSeparator, OutputKind, PayloadFormat, ReadingCache};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

/// Self-describing advertisement: flags record, then vendor record
fn self_describing_frame(label: &str, unit: &str, precision: u8, raw: i32) -> Vec<u8> {
    let mut payload = vec![0xFF, 0xFF, label.len() as u8];
    payload.extend_from_slice(label.as_bytes());
    payload.push(unit.len() as u8);
    payload.extend_from_slice(unit.as_bytes());
    payload.push(precision);
    payload.extend_from_slice(&raw.to_be_bytes());
    wrap(payload)
}

/// Legacy advertisement carrying all ten slots
fn legacy_frame() -> Vec<u8> {
    let raw: [u16; 10] = [2346, 5012, 10132, 41000, 120, 250, 380, 5000, 331, 7];
    let mut payload = vec![0xFF, 0xFF];
    payload.extend_from_slice(&(raw.len() as u16).to_be_bytes());
    for value in raw {
        payload.extend_from_slice(&value.to_be_bytes());
    }
    wrap(payload)
}

fn wrap(payload: Vec<u8>) -> Vec<u8> {
    let mut adv = vec![0x02, 0x01, 0x06, payload.len() as u8 + 1, 0xFF];
    adv.extend(payload);
    adv
}

/// A fake source that yields pre-built frames, similar to the one in app.rs tests.
struct FakeSource {
    frames: Vec<Vec<u8>>,
}

impl FrameSource for FakeSource {
    fn frames(&self) -> mpsc::Receiver<FrameResult> {
        let frames = self.frames.clone();
        let (tx, rx) = mpsc::channel::<FrameResult>(frames.len().max(1));
        tokio::spawn(async move {
            for frame in frames {
                let _ = tx.send(Ok(frame)).await;
            }
        });
        rx
    }
}

fn default_options() -> Options {
    Options {
        format: PayloadFormat::SelfDescribing,
        output: OutputKind::Display,
        influxdb_measurement: "ble_advertiser".to_string(),
        decimal_separator: DecimalSeparator::Point,
        throttle: None,
        max_age: None,
        summary: false,
        verbose: false,
    }
}

fn run(rt: &Runtime, options: Options, source: &FakeSource, capacity: usize) -> Vec<u8> {
    let cache = ReadingCache::new();
    let mut out = Vec::<u8>::with_capacity(capacity);
    let mut err = Vec::<u8>::new();

    rt.block_on(async {
        run_with_io(options, source, &cache, &mut out, &mut err)
            .await
            .unwrap();
    });

    out
}

/// Benchmark the full pipeline: source -> scan -> decode -> cache -> format -> write
fn bench_app_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("app_pipeline");
    let rt = Runtime::new().unwrap();
    group.throughput(Throughput::Elements(1));

    let source = FakeSource {
        frames: vec![self_describing_frame("Temperature", "°C", 2, 2346)],
    };
    group.bench_function("single_self_describing", |b| {
        b.iter(|| black_box(run(&rt, default_options(), &source, 64)))
    });

    let source = FakeSource {
        frames: vec![legacy_frame()],
    };
    group.bench_function("single_legacy", |b| {
        b.iter(|| {
            let mut options = default_options();
            options.format = PayloadFormat::Legacy;
            black_box(run(&rt, options, &source, 512))
        })
    });

    let source = FakeSource {
        frames: vec![self_describing_frame("Temperature", "°C", 2, 2346)],
    };
    group.bench_function("single_influxdb", |b| {
        b.iter(|| {
            let mut options = default_options();
            options.output = OutputKind::Influxdb;
            black_box(run(&rt, options, &source, 128))
        })
    });

    group.finish();
}

/// Benchmark batch processing through the full pipeline
fn bench_batch_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_pipeline");
    let rt = Runtime::new().unwrap();
    let frame = self_describing_frame("Temperature", "°C", 2, 2346);

    for batch_size in [1, 10, 100] {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                let source = FakeSource {
                    frames: (0..size).map(|_| frame.clone()).collect(),
                };
                b.iter(|| black_box(run(&rt, default_options(), &source, 64 * size)))
            },
        );
    }

    group.finish();
}

/// Benchmark with throttling enabled (realistic scenario where most readings are dropped)
fn bench_throttled_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("throttled_pipeline");
    let rt = Runtime::new().unwrap();

    // 100 readings for the same label, throttle set to 1 hour
    let frame = self_describing_frame("Temperature", "°C", 2, 2346);
    let source = FakeSource {
        frames: (0..100).map(|_| frame.clone()).collect(),
    };

    group.throughput(Throughput::Elements(100));
    group.bench_function("100_same_label_throttled", |b| {
        b.iter(|| {
            let mut options = default_options();
            options.throttle = Some(std::time::Duration::from_secs(3600));
            let out = run(&rt, options, &source, 64);

            debug_assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 1);
            black_box(out)
        })
    });

    group.finish();
}

/// Benchmark with many labels, with cache eviction and a final summary
fn bench_multi_label_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_label_pipeline");
    let rt = Runtime::new().unwrap();

    let source = FakeSource {
        frames: (0..10)
            .map(|i| self_describing_frame(&format!("Sensor{i}"), "", 1, i * 10))
            .collect(),
    };

    group.throughput(Throughput::Elements(10));
    group.bench_function("10_labels_with_summary", |b| {
        b.iter(|| {
            let mut options = default_options();
            options.max_age = Some(std::time::Duration::from_secs(60));
            options.summary = true;
            black_box(run(&rt, options, &source, 64 * 20))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_app_pipeline,
    bench_batch_pipeline,
    bench_throttled_pipeline,
    bench_multi_label_pipeline,
);
criterion_main!(benches);
