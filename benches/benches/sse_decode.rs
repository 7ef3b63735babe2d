//! Benchmarks for event-stream decoding
//!
//! Performance-critical paths:
//! - `SseDecoder::push`: line splitting and JSON parsing per network read
//! - Read sizes from a few bytes up to whole bodies

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mosaic_stream::{SseDecoder, StreamEvent};

/// Body of `events` chunk events followed by `done`.
fn body(events: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..events {
        let event = StreamEvent::chunk(format!("word{i} and “quoted” text, "));
        body.push_str("data: ");
        body.push_str(&serde_json::to_string(&event).unwrap_or_default());
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body.into_bytes()
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("sse_decode/push");
    let body = body(500);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for read_size in [16usize, 256, 4096, body.len()] {
        group.bench_with_input(BenchmarkId::from_parameter(read_size), &read_size, |b, &size| {
            b.iter(|| {
                let mut decoder = SseDecoder::new();
                let mut count = 0;
                for read in body.chunks(size) {
                    count += decoder.push(black_box(read)).len();
                }
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push);
criterion_main!(benches);
