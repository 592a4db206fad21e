use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rowan_tree::{Strategy, TreeMap};
use std::collections::BTreeMap;

const N: usize = 10_000;

const STRATEGIES: [(&str, Strategy); 3] = [
    ("Unbalanced", Strategy::Unbalanced),
    ("Avl", Strategy::Avl),
    ("Scapegoat", Strategy::Scapegoat),
];

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

// ─── Insert benchmarks ──────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");

    // The unbalanced tree is omitted here on purpose; sorted input makes it
    // quadratic overall and drowns out the interesting comparison.
    for (name, strategy) in [STRATEGIES[1], STRATEGIES[2]] {
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter(|| {
                let mut map = TreeMap::with_strategy(strategy);
                for i in 0..N as i64 {
                    map.insert(i, i);
                }
                map
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_insert_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_reverse");

    for (name, strategy) in [STRATEGIES[1], STRATEGIES[2]] {
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter(|| {
                let mut map = TreeMap::with_strategy(strategy);
                for i in (0..N as i64).rev() {
                    map.insert(i, i);
                }
                map
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in (0..N as i64).rev() {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("insert_random");

    for (name, strategy) in STRATEGIES {
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter(|| {
                let mut map = TreeMap::with_strategy(strategy);
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

// ─── Lookup benchmarks ──────────────────────────────────────────────────────

fn bench_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("get_random");

    for (name, strategy) in STRATEGIES {
        let map: TreeMap<i64, i64> = keys
            .iter()
            .fold(TreeMap::with_strategy(strategy), |mut map, &k| {
                map.insert(k, k);
                map
            });
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for k in &keys {
                    if let Some(&v) = map.get(k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });
    }

    let map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_get_by_rank(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("get_by_rank");

    for (name, strategy) in STRATEGIES {
        let map: TreeMap<i64, i64> = keys
            .iter()
            .fold(TreeMap::with_strategy(strategy), |mut map, &k| {
                map.insert(k, k);
                map
            });
        let len = map.len();
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for rank in 0..len {
                    if let Some((_, &v)) = map.get_by_rank(rank) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });
    }

    group.finish();
}

// ─── Remove benchmarks ──────────────────────────────────────────────────────

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let ordered = ordered_keys(N);
    let mut group = c.benchmark_group("remove_random");

    for (name, strategy) in STRATEGIES {
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter_with_setup(
                || {
                    keys.iter()
                        .chain(ordered.iter())
                        .fold(TreeMap::with_strategy(strategy), |mut map, &k| {
                            map.insert(k, k);
                            map
                        })
                },
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
            );
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_with_setup(
            || {
                keys.iter()
                    .chain(ordered.iter())
                    .map(|&k| (k, k))
                    .collect::<BTreeMap<i64, i64>>()
            },
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_reverse,
    bench_insert_random,
    bench_get_random,
    bench_get_by_rank,
    bench_remove_random,
);
criterion_main!(benches);
