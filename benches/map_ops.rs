//! Point-operation benchmarks comparing RbMap to std::collections::BTreeMap.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rbmap::RbMap;
use std::collections::BTreeMap;

fn generate_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("route:{:08}", i.wrapping_mul(2_654_435_761) % 100_000_000)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut map: BTreeMap<String, u64> = BTreeMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.clone(), i as u64);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("RbMap", size), size, |b, _| {
            b.iter(|| {
                let mut map: RbMap<String, u64> = RbMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.clone(), i as u64);
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);
        let btree: BTreeMap<String, u64> = keys.iter().cloned().zip(0..).collect();
        let rb: RbMap<String, u64> = keys.iter().cloned().zip(0..).collect();

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in keys.iter() {
                    if let Some(v) = btree.get(key) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("RbMap", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in keys.iter() {
                    if let Some(v) = rb.get(key) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in [1_000, 10_000].iter() {
        let keys = generate_keys(*size);
        let btree: BTreeMap<String, u64> = keys.iter().cloned().zip(0..).collect();
        let rb: RbMap<String, u64> = keys.iter().cloned().zip(0..).collect();

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut map = btree.clone();
                for key in keys.iter() {
                    map.remove(key);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("RbMap", size), size, |b, _| {
            b.iter(|| {
                let mut map = rb.clone();
                for key in keys.iter() {
                    map.remove(key);
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_remove);
criterion_main!(benches);
