//! Allocator benchmarks across catalog sizes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use costforge::{Allocator, Catalog};

fn build_catalog(services: usize, meters_per_service: usize) -> Catalog {
    let mut catalog = Catalog::default();
    for s in 0..services {
        let meters = catalog.services.entry(format!("service_{s}")).or_default();
        for m in 0..meters_per_service {
            meters.insert(format!("meter_{m}"), 0.01 + (m as f64) * 0.07);
        }
    }
    catalog
}

fn bench_allocate(c: &mut Criterion) {
    let allocator = Allocator::new();
    let small = build_catalog(6, 3);
    let large = build_catalog(50, 10);

    c.bench_function("allocate_6x3", |b| {
        b.iter(|| allocator.allocate(black_box(25_000.0), &small));
    });

    c.bench_function("allocate_50x10", |b| {
        b.iter(|| allocator.allocate(black_box(25_000.0), &large));
    });
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
