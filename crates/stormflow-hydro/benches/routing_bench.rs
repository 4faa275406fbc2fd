//! Criterion benchmarks for stormflow-hydro: unit hydrograph generation, convolution, and routing.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use stormflow_hydro::{LevelPoolRouter, Nakayasu, RatingTable, ScsTriangular, TimeSeries, convolve};

fn make_storm(n: usize) -> TimeSeries {
    let values: Vec<f64> = (0..n).map(|i| ((i as f64 * 0.3).sin() + 1.0) * 4.0).collect();
    TimeSeries::uniform(5.0, values).unwrap()
}

fn make_router() -> LevelPoolRouter {
    let storage = RatingTable::from_pairs(
        "stage-storage",
        &[(0.0, 0.0), (1.0, 50_000.0), (2.0, 150_000.0), (3.0, 300_000.0), (4.0, 500_000.0)],
    )
    .unwrap();
    let discharge = RatingTable::from_pairs(
        "stage-discharge",
        &[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 10.0), (4.0, 25.0)],
    )
    .unwrap();
    LevelPoolRouter::new(storage, discharge).unwrap()
}

fn bench_unit_hydrographs(c: &mut Criterion) {
    let scs = ScsTriangular::new(120.0, 250.0).unwrap();
    let nakayasu = Nakayasu::new(250.0, 6.0).unwrap();

    c.bench_function("scs_generate_dt5", |b| b.iter(|| scs.generate(5.0).unwrap()));
    c.bench_function("nakayasu_generate_dt5", |b| b.iter(|| nakayasu.generate(5.0).unwrap()));
}

fn bench_convolve(c: &mut Criterion) {
    let uh = ScsTriangular::new(120.0, 250.0).unwrap().generate(5.0).unwrap();
    let mut group = c.benchmark_group("convolve");
    for &len in &[24usize, 96, 288] {
        let storm = make_storm(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &storm, |b, storm| {
            b.iter(|| convolve(storm, &uh).unwrap());
        });
    }
    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let router = make_router();
    let mut group = c.benchmark_group("level_pool_route");
    for &len in &[100usize, 1_000, 10_000] {
        let inflow = make_storm(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &inflow, |b, inflow| {
            b.iter(|| router.route(inflow).unwrap());
        });
    }
    group.finish();

    let batch: Vec<TimeSeries> = (0..32).map(|_| make_storm(1_000)).collect();
    c.bench_function("route_batch_32x1000", |b| b.iter(|| router.route_batch(&batch)));
}

criterion_group!(benches, bench_unit_hydrographs, bench_convolve, bench_route);
criterion_main!(benches);
