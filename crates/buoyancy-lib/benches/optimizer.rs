use buoyancy_lib::{
    calculate_hex_packing, optimize, BoxDimensions, MaterialSelection, OptimizationParams,
    Orientation,
};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;

static DEFAULT_PARAMS: Lazy<OptimizationParams> = Lazy::new(OptimizationParams::default);
static PACKED_PARAMS: Lazy<OptimizationParams> = Lazy::new(|| OptimizationParams {
    box_dimensions: BoxDimensions::enabled(400.0, 300.0, 600.0),
    ..OptimizationParams::default()
});
static PLASTICS_PARAMS: Lazy<OptimizationParams> = Lazy::new(|| OptimizationParams {
    material: MaterialSelection::Compare {
        keys: ["ABS", "ASA", "PC", "PETG", "PLA", "POM", "PP", "HDPE"]
            .into_iter()
            .map(String::from)
            .collect(),
    },
    ..OptimizationParams::default()
});

fn benchmark_optimizer(c: &mut Criterion) {
    c.bench_function("optimize_default_abs", |b| {
        let params = &*DEFAULT_PARAMS;
        b.iter(|| {
            let results = optimize(params).expect("valid params");
            black_box(results.len())
        });
    });

    c.bench_function("optimize_abs_packed", |b| {
        let params = &*PACKED_PARAMS;
        b.iter(|| {
            let results = optimize(params).expect("valid params");
            black_box(results.first().map(|r| r.ranking_key()))
        });
    });

    c.bench_function("optimize_compare_plastics", |b| {
        let params = &*PLASTICS_PARAMS;
        b.iter(|| {
            let results = optimize(params).expect("valid params");
            black_box(results.len())
        });
    });

    c.bench_function("hex_packing_all_axes", |b| {
        b.iter(|| {
            let packings = calculate_hex_packing(
                black_box(42.0),
                black_box(180.0),
                400.0,
                300.0,
                600.0,
                Orientation::All,
                0,
                1.5,
            );
            black_box(packings)
        });
    });
}

criterion_group!(benches, benchmark_optimizer);
criterion_main!(benches);
