//! Benchmarks for geolocation cluster verification

use agrisure_algorithms::geolocation::verify_geolocation;
use agrisure_core::config::GeolocationParams;
use agrisure_core::model::Coordinate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_points(n: usize) -> Vec<Coordinate> {
    (0..n)
        .map(|i| {
            let dlat = ((i * 7) % 100) as f64 * 1e-4;
            let dlon = ((i * 13) % 100) as f64 * 1e-4;
            Coordinate::new(12.9 + dlat, 77.5 + dlon).unwrap()
        })
        .collect()
}

fn bench_verify_geolocation(c: &mut Criterion) {
    let params = GeolocationParams::default();
    let mut group = c.benchmark_group("geolocation/verify");
    for n in [10, 100, 1_000, 10_000] {
        let points = create_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| verify_geolocation(black_box(&points), black_box(&params)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_verify_geolocation);
criterion_main!(benches);
