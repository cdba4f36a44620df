// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pk_linref::{
    CalibratedLayer, Feature, FeatureId, LayerIndex, MeasuredGeometry, MeasurementUnit, Point,
    locate_point_by_pk, project_and_resolve_pk,
};

/// A zig-zag road of `vertices` vertices, 100 m apart, measured in meters from `m0`.
fn zigzag(vertices: usize, x0: f64, y0: f64, m0: f64) -> MeasuredGeometry {
    let coords: Vec<(f64, f64, f64)> = (0..vertices)
        .map(|i| {
            let x = x0 + i as f64 * 80.0;
            let y = y0 + if i % 2 == 0 { 0.0 } else { 60.0 };
            (x, y, m0 + i as f64 * 100.0)
        })
        .collect();
    MeasuredGeometry::from_xym(&coords)
}

/// `roads` parallel roads of `features` features each.
fn network(roads: usize, features: usize, vertices: usize) -> CalibratedLayer {
    let mut layer = CalibratedLayer::new("roads", ["ID_ROAD"]);
    let span = (vertices - 1) as f64 * 80.0;
    let mut id = 0;
    for r in 0..roads {
        for f in 0..features {
            id += 1;
            let m0 = f as f64 * (vertices - 1) as f64 * 100.0;
            layer.push(
                Feature::new(
                    FeatureId(id),
                    zigzag(vertices, f as f64 * span, r as f64 * 500.0, m0),
                )
                .with_attribute("ID_ROAD", format!("R-{r}")),
            );
        }
    }
    layer
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("pk_linref_resolve");
    for &vertices in &[16_usize, 256, 4_096] {
        let geometry = zigzag(vertices, 0.0, 0.0, 0.0);
        let query = Point::new((vertices as f64) * 40.0, 45.0);
        group.bench_with_input(BenchmarkId::from_parameter(vertices), &geometry, |b, g| {
            b.iter(|| black_box(project_and_resolve_pk(g, black_box(query), MeasurementUnit::Meters)));
        });
    }
    group.finish();
}

fn bench_nearest_feature(c: &mut Criterion) {
    let mut group = c.benchmark_group("pk_linref_nearest_feature");
    for &roads in &[10_usize, 100] {
        let layer = network(roads, 20, 64);
        let index = LayerIndex::build(&layer, "ID_ROAD");
        let query = Point::new(12_345.0, roads as f64 * 250.0 + 130.0);
        group.bench_with_input(BenchmarkId::from_parameter(roads * 20), &index, |b, index| {
            b.iter(|| black_box(index.nearest_feature(black_box(query))));
        });
    }
    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("pk_linref_locate");
    let layer = network(50, 20, 64);
    let index = LayerIndex::build(&layer, "ID_ROAD");
    group.bench_function("indexed", |b| {
        b.iter(|| black_box(index.locate("R-25", black_box(100.05), MeasurementUnit::Meters)));
    });
    group.bench_function("layer_scan", |b| {
        b.iter(|| {
            let road = layer
                .features()
                .iter()
                .filter(|f| f.attribute("ID_ROAD") == Some("R-25"));
            black_box(locate_point_by_pk(
                road,
                "R-25",
                black_box(100.05),
                MeasurementUnit::Meters,
            ))
        });
    });
    group.bench_function("build_layer_index", |b| {
        b.iter(|| black_box(LayerIndex::build(&layer, "ID_ROAD").road_count()));
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_nearest_feature, bench_locate);
criterion_main!(benches);
