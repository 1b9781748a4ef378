//! Single-tree training benchmarks.
//!
//! Run with: `cargo bench --bench training`

#[path = "../../common/mod.rs"]
mod common;

use common::criterion_config::default_criterion;

use msutree::testing::{random_classification, random_regression};
use msutree::training::{MsuTreeTrainer, TreeParams};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bench_nominal_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/train/nominal");

    for n_rows in [500usize, 2_000, 10_000] {
        let dataset = random_classification(n_rows, 4, 4, 3, 42, 0.1, 0.0);
        let trainer = MsuTreeTrainer::new(TreeParams::default());

        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("mixed_8", n_rows), &dataset, |b, ds| {
            b.iter(|| black_box(trainer.train(black_box(ds)).unwrap()))
        });
    }

    group.finish();
}

fn bench_numeric_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/train/numeric");

    for n_rows in [500usize, 2_000, 10_000] {
        let dataset = random_regression(n_rows, 8, 42, 0.5);
        let params = TreeParams::builder()
            .do_not_check_capabilities(true)
            .build()
            .unwrap();
        let trainer = MsuTreeTrainer::new(params);

        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("numeric_8", n_rows), &dataset, |b, ds| {
            b.iter(|| black_box(trainer.train(black_box(ds)).unwrap()))
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_nominal_target, bench_numeric_target
}
criterion_main!(benches);
