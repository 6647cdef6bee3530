//! Layout and mesh generation benchmarks.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gridglow::layout::GridConfiguration;
use gridglow::renderer::geometry::capsule::CapsuleGeometry;

fn instance_data_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("instance_data");

    for count in [100, 1000, 10_000] {
        let grid = GridConfiguration::new(count);
        group.bench_function(format!("{count}_instances"), |b| {
            b.iter(|| black_box(black_box(&grid).instance_data()));
        });
    }
    group.finish();
}

fn capsule_generation_benchmark(c: &mut Criterion) {
    let geometry = CapsuleGeometry::default();
    c.bench_function("capsule_generate", |b| {
        b.iter(|| black_box(black_box(&geometry).generate()));
    });
}

criterion_group!(benches, instance_data_benchmark, capsule_generation_benchmark);
criterion_main!(benches);
