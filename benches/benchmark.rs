use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};

use attrkit::{studly, Kind, Model};

struct Row;
impl Kind for Row {}

fn wide(n: usize) -> Map<String, Value> {
    (0..n).map(|i| (format!("column_{}", i), json!(i))).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    // first call fills the cache, the rest are lookups
    c.bench_function("studly cached", |b| b.iter(|| studly(black_box("first_name-and_more"))));

    let attributes = wide(10);
    c.bench_function("fill 10", |b| {
        b.iter(|| {
            let mut row = Model::<Row>::default();
            row.fill(black_box(attributes.clone())).map(|row| row.get_attributes().len())
        })
    });
    let attributes = wide(1000);
    c.bench_function("fill 1k", |b| {
        b.iter(|| {
            let mut row = Model::<Row>::default();
            row.fill(black_box(attributes.clone())).map(|row| row.get_attributes().len())
        })
    });

    let mut row = Model::<Row>::default();
    row.set_raw_attributes(wide(1000), true);
    c.bench_function("get_dirty 1k clean", |b| b.iter(|| black_box(&row).get_dirty()));
    for i in (0..1000).step_by(2) {
        // numeric strings stay equivalent, so only half of these are dirty
        let value = if i % 4 == 0 { json!(i.to_string()) } else { json!(format!("x{}", i)) };
        row.set(&format!("column_{}", i), value);
    }
    c.bench_function("get_dirty 1k mixed", |b| b.iter(|| black_box(&row).get_dirty()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
