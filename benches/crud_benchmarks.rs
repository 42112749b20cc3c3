use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ord_btree::BTree;
use std::collections::BTreeSet;

const N: usize = 10_000;

/// Orders benchmarked for the configurable tree; `BTreeSet` is the baseline.
const ORDERS: [usize; 3] = [8, 32, 128];

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insert Benchmarks ──────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    for order in ORDERS {
        group.bench_function(BenchmarkId::new("BTree", order), |b| {
            b.iter(|| {
                let mut tree = BTree::new(order);
                for &k in keys {
                    tree.insert(k);
                }
                tree
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_reverse(c: &mut Criterion) {
    bench_insert(c, "insert_reverse", &reverse_ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

// ─── Contains Benchmarks ────────────────────────────────────────────────────

fn bench_contains(c: &mut Criterion, name: &str, lookup_keys: &[i64]) {
    let keys = ordered_keys(N);
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group(name);

    for order in ORDERS {
        let tree = BTree::from_elements(keys.iter().copied(), order).unwrap();
        group.bench_function(BenchmarkId::new("BTree", order), |b| {
            b.iter(|| {
                let mut count = 0usize;
                for k in lookup_keys {
                    if tree.contains(k) {
                        count += 1;
                    }
                }
                count
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut count = 0usize;
            for k in lookup_keys {
                if bt_set.contains(k) {
                    count += 1;
                }
            }
            count
        });
    });

    group.finish();
}

fn bench_contains_ordered(c: &mut Criterion) {
    bench_contains(c, "contains_ordered", &ordered_keys(N));
}

fn bench_contains_reverse(c: &mut Criterion) {
    bench_contains(c, "contains_reverse", &reverse_ordered_keys(N));
}

fn bench_contains_random(c: &mut Criterion) {
    bench_contains(c, "contains_random", &random_keys(N));
}

// ─── Remove Benchmarks ──────────────────────────────────────────────────────

fn bench_remove(c: &mut Criterion, name: &str, removal_keys: &[i64]) {
    let keys = ordered_keys(N);

    let mut group = c.benchmark_group(name);

    for order in ORDERS {
        group.bench_function(BenchmarkId::new("BTree", order), |b| {
            b.iter_batched(
                || BTree::from_elements(keys.iter().copied(), order).unwrap(),
                |mut tree| {
                    for k in removal_keys {
                        tree.remove(k);
                    }
                    tree
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for k in removal_keys {
                    set.remove(k);
                }
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_remove_ordered(c: &mut Criterion) {
    bench_remove(c, "remove_ordered", &ordered_keys(N));
}

fn bench_remove_reverse(c: &mut Criterion) {
    bench_remove(c, "remove_reverse", &reverse_ordered_keys(N));
}

fn bench_remove_random(c: &mut Criterion) {
    bench_remove(c, "remove_random", &random_keys(N));
}

// ─── Range Benchmarks ───────────────────────────────────────────────────────

fn bench_range_search(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let mut group = c.benchmark_group("range_search");

    for order in ORDERS {
        let tree = BTree::from_elements(keys.iter().copied(), order).unwrap();
        group.bench_function(BenchmarkId::new("BTree", order), |b| {
            b.iter(|| tree.range_search(&1_000, &2_000));
        });
    }

    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| bt_set.range(1_000..=2_000).copied().collect::<Vec<i64>>());
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_insert_ordered, bench_insert_reverse, bench_insert_random,);

criterion_group!(contains_benches, bench_contains_ordered, bench_contains_reverse, bench_contains_random,);

criterion_group!(remove_benches, bench_remove_ordered, bench_remove_reverse, bench_remove_random,);

criterion_group!(range_benches, bench_range_search,);

criterion_main!(insert_benches, contains_benches, remove_benches, range_benches,);
