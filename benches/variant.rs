//! Benchmarks for `Variant` assignment, comparison and arithmetic.
//!
//! Covers the operations that run on every message field:
//! - Assignment into an existing buffer versus a fresh value
//! - Dictionary lookups through the key order
//! - Dictionary merge operators
//! - Scalar arithmetic through the default engine

extern crate netvariant;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use netvariant::Variant;
use std::hint::black_box;

fn sample_dict(len: i32, offset: i32) -> Variant {
    (0..len)
        .map(|n| (n + offset, format!("value-{n}")))
        .collect()
}

/// Benchmark assigning a string into a value that already owns a larger buffer.
fn bench_assign_reuses_buffer(c: &mut Criterion) {
    let src = Variant::from("a short payload");

    c.bench_function("assign_str_existing_buffer", |b| {
        let mut dst = Variant::from("x".repeat(64));
        b.iter(|| {
            dst.assign(black_box(&src));
            black_box(&dst);
        });
    });

    c.bench_function("assign_str_fresh", |b| {
        b.iter(|| {
            let mut dst = Variant::Nil;
            dst.assign(black_box(&src));
            black_box(dst)
        });
    });
}

/// Benchmark key lookup in a 1000 entry dictionary with mixed numeric sub-kinds.
fn bench_dict_lookup(c: &mut Criterion) {
    let dict = sample_dict(1000, 0);
    let key = Variant::from(500_u64);

    c.bench_function("dict_lookup_1000", |b| {
        b.iter(|| black_box(dict.get(black_box(&key))));
    });
}

/// Benchmark the four dictionary merge operators on half-overlapping inputs.
fn bench_dict_merge(c: &mut Criterion) {
    let left = sample_dict(256, 0);
    let right = sample_dict(256, 128);

    c.bench_function("dict_union_256", |b| {
        b.iter(|| black_box(black_box(&left) + black_box(&right)));
    });
    c.bench_function("dict_difference_256", |b| {
        b.iter(|| black_box(black_box(&left) - black_box(&right)));
    });
    c.bench_function("dict_intersection_256", |b| {
        b.iter(|| black_box(black_box(&left) * black_box(&right)));
    });
    c.bench_function("dict_symmetric_difference_256", |b| {
        b.iter_batched(
            || left.clone(),
            |mut value| {
                value /= black_box(&right);
                value
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark scalar arithmetic with and without promotion.
fn bench_scalar_arithmetic(c: &mut Criterion) {
    let int = Variant::from(41_i32);
    let byte = Variant::from(1_u8);
    let double = Variant::from(0.5_f64);

    c.bench_function("scalar_add_i32_u8", |b| {
        b.iter(|| black_box(black_box(&int) + black_box(&byte)));
    });
    c.bench_function("scalar_mul_i32_f64", |b| {
        b.iter(|| black_box(black_box(&int) * black_box(&double)));
    });
}

/// Benchmark string concatenation and filtering.
fn bench_string_ops(c: &mut Criterion) {
    let text = Variant::from("GET /index.html HTTP/1.1 ".repeat(8));
    let needle = Variant::from("HTTP/1.1");

    c.bench_function("str_concat", |b| {
        b.iter(|| black_box(black_box(&text) + black_box(&needle)));
    });
    c.bench_function("str_filter", |b| {
        b.iter(|| black_box(black_box(&text) - black_box(&needle)));
    });
}

criterion_group!(
    benches,
    bench_assign_reuses_buffer,
    bench_dict_lookup,
    bench_dict_merge,
    bench_scalar_arithmetic,
    bench_string_ops
);
criterion_main!(benches);
