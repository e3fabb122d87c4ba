//! Benchmarks for geometry hot paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use facilitymap_core::feature::{Feature, Properties};
use facilitymap_geo::{
    distance_point_to_polyline_km, haversine_distance, parse_shape_query_str, point_in_polygon,
    Coordinate, ProximityFilter, DEFAULT_SECTOR_STEP_DEG,
};

fn create_test_features(count: usize) -> Vec<Feature> {
    (0..count)
        .map(|i| {
            // Grid over the Taiwan Strait
            let lat = 22.0 + (i as f64 * 0.01) % 4.0;
            let lng = 118.0 + (i as f64 * 0.013) % 4.0;
            Feature::point_feature(lat, lng, Properties::new())
        })
        .collect()
}

fn bench_primitives(c: &mut Criterion) {
    let taipei = Coordinate::new(25.0330, 121.5654);
    let kaohsiung = Coordinate::new(22.6273, 120.3014);
    let ring: Vec<Coordinate> = (0..64)
        .map(|i| {
            let a = (i as f64 / 64.0) * std::f64::consts::TAU;
            Coordinate::new(24.0 + a.sin(), 120.0 + a.cos())
        })
        .collect();

    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_distance(black_box(&taipei), black_box(&kaohsiung)))
    });
    c.bench_function("point_in_polygon_64", |b| {
        b.iter(|| point_in_polygon(black_box(&taipei), black_box(&ring)))
    });
    c.bench_function("polyline_distance_64", |b| {
        b.iter(|| distance_point_to_polyline_km(black_box(&taipei), black_box(&ring)))
    });
}

fn bench_shape_filter(c: &mut Criterion) {
    let query = parse_shape_query_str(
        "shape=multi&circle=120,25,30&sector=121,23,60,300,60\
         &poly=119,22;120,22;120,23;119,23&line=118,24;122,24",
    );
    let filter = ProximityFilter::new(&query, 50.0, DEFAULT_SECTOR_STEP_DEG);

    let mut group = c.benchmark_group("shape_filter");
    for size in [100, 1000, 10000].iter() {
        let features = create_test_features(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| filter.filter_all(black_box(&features)))
        });
    }
    group.finish();
}

fn bench_shape_parsing(c: &mut Criterion) {
    let link = "shape=multi&circle=120,25,50|Base A&circle=121,26,30\
                &poly=120,25;121,25;121,26&sector=120,25,40,300,60&circle_text[1]=Second";
    c.bench_function("parse_shape_query", |b| {
        b.iter(|| parse_shape_query_str(black_box(link)))
    });
}

criterion_group!(benches, bench_primitives, bench_shape_filter, bench_shape_parsing);
criterion_main!(benches);
