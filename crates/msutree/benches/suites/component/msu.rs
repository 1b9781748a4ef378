//! MSU oracle and categorical view benchmarks.
//!
//! Run with: `cargo bench --bench msu`

#[path = "../../common/mod.rs"]
mod common;

use common::criterion_config::default_criterion;

use msutree::data::{CategoricalView, InstanceSubset};
use msutree::testing::random_classification;
use msutree::training::{MultivariateSymmetricalUncertainty, UncertaintyOracle};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bench_categorical_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/msu/view");

    for n_rows in [1_000usize, 10_000] {
        let dataset = random_classification(n_rows, 4, 4, 3, 7, 0.1, 0.0);
        let subset = InstanceSubset::all(&dataset);

        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("from_subset", n_rows), &subset, |b, s| {
            b.iter(|| black_box(CategoricalView::from_subset(&dataset, black_box(s)).unwrap()))
        });
    }

    group.finish();
}

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/msu/score");
    let oracle = MultivariateSymmetricalUncertainty;

    let dataset = random_classification(10_000, 4, 4, 3, 7, 0.1, 0.0);
    let view = CategoricalView::from_subset(&dataset, &InstanceSubset::all(&dataset)).unwrap();

    for path_len in [1usize, 2, 4, 8] {
        let subset: Vec<usize> = (0..path_len).collect();
        group.bench_with_input(BenchmarkId::new("path", path_len), &subset, |b, s| {
            b.iter(|| {
                black_box(oracle.score(
                    view.data(),
                    view.cardinalities(),
                    black_box(s),
                    view.labels(),
                    view.n_labels(),
                ))
            })
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_categorical_view, bench_oracle
}
criterion_main!(benches);
