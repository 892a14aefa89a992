//! Criterion benchmarks for grid construction across resolutions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hexglobe::prelude::*;
use std::hint::black_box;

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_grid_build");
    for resolution in [0u32, 1, 2, 4] {
        group.bench_with_input(
            BenchmarkId::new("swaps_on", resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| TileGrid::new(black_box(resolution)).unwrap());
            },
        );
        group.bench_with_input(
            BenchmarkId::new("swaps_off", resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| {
                    TileGrid::build(GridConfig {
                        resolution: black_box(resolution),
                        swap_tiles: false,
                    })
                    .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let grid = TileGrid::new(2).unwrap();
    c.bench_function("tile_grid_validate_res2", |b| {
        b.iter(|| black_box(&grid).validate().unwrap());
    });
}

criterion_group!(benches, bench_construction, bench_validation);
criterion_main!(benches);
