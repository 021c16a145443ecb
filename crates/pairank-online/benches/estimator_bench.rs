use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pairank_core::models::Comparison;
use pairank_core::types::{EntityId, FxHashMap, UserId};
use pairank_online::{solve_individual_scores, LocalEstimator, SolveOptions};

/// One contributor's comparisons over `n` entities: a chain plus skip links.
fn build_comparisons(n: i64) -> Vec<Comparison> {
    let mut comparisons = Vec::new();
    for i in 0..n {
        for step in [1, 3, 7] {
            let j = i + step;
            if j < n {
                let score = ((i * 31 + step * 17) % 21 - 10) as f64;
                comparisons.push(Comparison::new(UserId(1), EntityId(i), EntityId(j), "reliability", score));
            }
        }
    }
    comparisons
}

fn bench_online_estimate(c: &mut Criterion) {
    let comparisons = build_comparisons(500);
    let estimator = LocalEstimator::default();
    let previous: FxHashMap<EntityId, f64> = (0..500).map(|i| (EntityId(i), (i % 9) as f64 - 4.0)).collect();

    c.bench_function("online_estimate_500_entities", |b| {
        b.iter(|| {
            estimator
                .estimate(black_box(&comparisons), EntityId(10), EntityId(11), &previous)
                .unwrap()
        });
    });
}

fn bench_full_solve(c: &mut Criterion) {
    let comparisons = build_comparisons(100);
    let estimator = LocalEstimator::default();
    let options = SolveOptions {
        max_sweeps: 2_000,
        tolerance: 1e-9,
    };

    c.bench_function("full_solve_100_entities", |b| {
        b.iter(|| solve_individual_scores(&estimator, black_box(&comparisons), options).unwrap());
    });
}

criterion_group!(benches, bench_online_estimate, bench_full_solve);
criterion_main!(benches);
