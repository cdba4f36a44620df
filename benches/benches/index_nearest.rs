// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pk_index::backends::{FlatVec, RTreeBackend};
use pk_index::{Aabb2D, Backend, Index};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1_u64 << 53) as f64)
    }
}

/// Long thin boxes, roughly what road segments look like in a 50 km square.
fn road_boxes(count: usize) -> Vec<Aabb2D> {
    let mut rng = Rng::new(0x3C6E_F35F_4750_2932);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * 50_000.0;
            let y = rng.next_f64() * 50_000.0;
            let len = 200.0 + rng.next_f64() * 2_000.0;
            if rng.next_u64() & 1 == 0 {
                Aabb2D::from_xywh(x, y, len, 20.0)
            } else {
                Aabb2D::from_xywh(x, y, 20.0, len)
            }
        })
        .collect()
}

fn queries(count: usize) -> Vec<(f64, f64)> {
    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    (0..count)
        .map(|_| (rng.next_f64() * 50_000.0, rng.next_f64() * 50_000.0))
        .collect()
}

fn build<B: Backend>(backend: B, boxes: &[Aabb2D]) -> Index<B> {
    let mut index = Index::with_backend(backend);
    for (slot, aabb) in boxes.iter().enumerate() {
        index.insert(slot, *aabb);
    }
    index
}

fn run_queries<B: Backend>(index: &Index<B>, qs: &[(f64, f64)], k: usize) -> usize {
    qs.iter()
        .map(|&(x, y)| index.nearest(x, y, k).map_or(0, |n| n.len()))
        .sum()
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("pk_index_nearest");
    let qs = queries(256);
    group.throughput(Throughput::Elements(qs.len() as u64));

    for &count in &[1_000_usize, 10_000, 50_000] {
        let boxes = road_boxes(count);
        let flat = build(FlatVec::default(), &boxes);
        let rtree = build(RTreeBackend::default(), &boxes);
        let bulk = Index::with_backend(RTreeBackend::bulk_load(
            boxes.iter().copied().enumerate(),
        ));

        group.bench_with_input(BenchmarkId::new("flatvec_k5", count), &count, |b, _| {
            b.iter(|| black_box(run_queries(&flat, &qs, 5)));
        });
        group.bench_with_input(BenchmarkId::new("rtree_k5", count), &count, |b, _| {
            b.iter(|| black_box(run_queries(&rtree, &qs, 5)));
        });
        group.bench_with_input(BenchmarkId::new("rtree_bulk_k5", count), &count, |b, _| {
            b.iter(|| black_box(run_queries(&bulk, &qs, 5)));
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("pk_index_build");
    for &count in &[1_000_usize, 10_000] {
        let boxes = road_boxes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("rtree_insert", count), &boxes, |b, boxes| {
            b.iter(|| black_box(build(RTreeBackend::default(), boxes)));
        });
        group.bench_with_input(BenchmarkId::new("rtree_bulk_load", count), &boxes, |b, boxes| {
            b.iter(|| black_box(RTreeBackend::bulk_load(boxes.iter().copied().enumerate())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nearest, bench_build);
criterion_main!(benches);
