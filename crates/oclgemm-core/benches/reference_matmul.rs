//! Criterion benchmarks for the sequential host reference multiply.
//!
//! This is the baseline the device path is timed against; the bench tracks
//! how the naive O(m*n*k) loop scales with square matrix order.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oclgemm_core::{reference, Matrix};
use std::hint::black_box;

fn bench_reference_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_matmul");

    for &order in &[32usize, 64, 128] {
        let a = Matrix::random(order, order, 1);
        let b = Matrix::random(order, order, 2);

        group.throughput(Throughput::Elements((order * order * order) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |bencher, _| {
            bencher.iter(|| {
                let c = reference::matmul(black_box(&a), black_box(&b)).unwrap();
                black_box(c)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reference_matmul);
criterion_main!(benches);
