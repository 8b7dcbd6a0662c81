use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rb_multiset::RedBlackTree;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
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

/// Keys drawn from a small domain so most inserts are duplicates.
fn duplicate_heavy_keys(n: usize) -> Vec<i64> {
    random_keys(n).into_iter().map(|k| k % 64).collect()
}

fn btree_multiset(keys: &[i64]) -> BTreeMap<i64, usize> {
    let mut map = BTreeMap::new();
    for &k in keys {
        *map.entry(k).or_insert(0) += 1;
    }
    map
}

// ─── Insertion ──────────────────────────────────────────────────────────────

fn bench_add(c: &mut Criterion) {
    for (name, keys) in [
        ("add_ordered", ordered_keys(N)),
        ("add_random", random_keys(N)),
        ("add_duplicates", duplicate_heavy_keys(N)),
    ] {
        let mut group = c.benchmark_group(name);

        group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
            b.iter(|| {
                let mut tree = RedBlackTree::new();
                for &k in &keys {
                    tree.add(k);
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap<_, count>", N), |b| {
            b.iter(|| btree_multiset(&keys));
        });

        group.finish();
    }
}

// ─── Lookup ─────────────────────────────────────────────────────────────────

fn bench_lookup(c: &mut Criterion) {
    let keys = duplicate_heavy_keys(N);
    let tree: RedBlackTree<i64> = keys.iter().copied().collect();
    let map = btree_multiset(&keys);

    let mut group = c.benchmark_group("occurrences_of");

    group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
        b.iter(|| (0..64).map(|k| tree.occurrences_of(black_box(&k))).sum::<usize>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap<_, count>", N), |b| {
        b.iter(|| (0..64).map(|k| map.get(black_box(&k)).copied().unwrap_or(0)).sum::<usize>());
    });

    group.finish();

    let keys = random_keys(N);
    let tree: RedBlackTree<i64> = keys.iter().copied().collect();

    c.bench_function("contains_random", |b| {
        b.iter(|| keys.iter().filter(|k| tree.contains(black_box(k))).count());
    });
}

// ─── Removal ────────────────────────────────────────────────────────────────

fn bench_pop(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("pop_all");

    group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<RedBlackTree<i64>>(),
            |mut tree| while tree.pop().is_some() {},
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BinaryHeap", N), |b| {
        b.iter_batched(
            || keys.iter().copied().map(Reverse).collect::<BinaryHeap<_>>(),
            |mut heap| while heap.pop().is_some() {},
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys(N);

    c.bench_function("remove_random", |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<RedBlackTree<i64>>(),
            |mut tree| {
                for k in &keys {
                    tree.remove(k);
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    let keys = duplicate_heavy_keys(N);
    c.bench_function("remove_all_duplicates", |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<RedBlackTree<i64>>(),
            |mut tree| {
                for k in 0..64 {
                    tree.remove_all(&k);
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

// ─── Iteration ──────────────────────────────────────────────────────────────

fn bench_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RedBlackTree<i64> = keys.iter().copied().collect();
    let mut buf = vec![0; N];

    c.bench_function("iter_sum", |b| b.iter(|| tree.iter().sum::<i64>()));
    c.bench_function("copy_to", |b| b.iter(|| tree.copy_to(black_box(&mut buf), 0)));
}

criterion_group!(benches, bench_add, bench_lookup, bench_pop, bench_remove, bench_iter);
criterion_main!(benches);
