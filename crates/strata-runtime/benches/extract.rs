use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use strata_field::FieldGrid;
use strata_mesh_cpu::extract;
use strata_noise::{NoiseParameters, NormalizeMode, PerlinParams, generate_3d};
use strata_runtime::{MeshingPool, SliceAxis};

fn perlin_grid(n: usize) -> FieldGrid {
    let params = NoiseParameters::Perlin(PerlinParams {
        seed: 1337,
        scale: 18.0,
        normalize: NormalizeMode::Global,
        ..Default::default()
    });
    generate_3d(&params, n, n, n).unwrap()
}

fn bench_extract_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_sequential");
    let grid = perlin_grid(64);
    group.bench_function("perlin_64", |b| {
        b.iter(|| black_box(extract(&grid, 0.5).unwrap()))
    });
    group.finish();
}

fn bench_extract_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_parallel");
    let grid = perlin_grid(64);
    for threads in [2, 4, 8] {
        let pool = MeshingPool::with_threads(threads).unwrap();
        group.bench_function(format!("perlin_64_x{threads}"), |b| {
            b.iter(|| black_box(pool.extract(&grid, 0.5, SliceAxis::X).unwrap()))
        });
    }
    group.finish();
}

fn bench_noise_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise_3d");
    group.bench_function("perlin_64", |b| b.iter(|| black_box(perlin_grid(64))));
    group.finish();
}

fn short_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(3))
        .sample_size(20)
}

criterion_group! {
    name = benches;
    config = short_config();
    targets =
        bench_extract_sequential,
        bench_extract_parallel,
        bench_noise_3d
}
criterion_main!(benches);
