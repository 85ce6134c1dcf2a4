use core::fmt;
use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use libfiap::time::FixedOffset;
use libfiap::upload::client::DataPoint;
use libfiap::upload::wire;

const ID_PREFIX: &str = "http://example.org/house/";

struct CountingWriter(usize);

impl fmt::Write for CountingWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

fn batch() -> Vec<DataPoint<'static>> {
    (0..16)
        .map(|i| DataPoint {
            suffix: "temperature",
            value: "23.5",
            time: 1_314_322_080 + i,
        })
        .collect()
}

fn bench_body_length(c: &mut Criterion) {
    let points = batch();
    c.bench_function("body_length/16", |b| {
        b.iter(|| wire::body_length(black_box(ID_PREFIX), black_box("+09:00"), &points))
    });
}

fn bench_write_body(c: &mut Criterion) {
    let points = batch();
    let tz = FixedOffset::new(9, 0);
    let bytes = wire::body_length(ID_PREFIX, tz.utc_offset(), &points);

    let mut group = c.benchmark_group("write_body");
    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("16_points", |b| {
        b.iter(|| {
            let mut out = CountingWriter(0);
            wire::write_body(&mut out, black_box(ID_PREFIX), &tz, &points).unwrap();
            out.0
        })
    });
    group.finish();
}

criterion_group!(benches, bench_body_length, bench_write_body);
criterion_main!(benches);
