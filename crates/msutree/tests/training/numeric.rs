use msutree::repr::{ClassDistribution, TreeNode};
use msutree::testing::random_regression;
use msutree::training::{CapabilityError, MsuTreeTrainer, TrainError, TreeParams};

use super::init_tracing;

fn params() -> TreeParams {
    TreeParams::builder()
        .do_not_check_capabilities(true)
        .seed(3)
        .build()
        .unwrap()
}

#[test]
fn numeric_target_requires_capability_override() {
    let ds = random_regression(50, 3, 1, 0.1);
    let err = MsuTreeTrainer::new(TreeParams::default()).train(&ds).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Capability(CapabilityError::UnsupportedClass { .. })
    ));
}

#[test]
fn regression_tree_fits_training_data() {
    init_tracing();
    let ds = random_regression(300, 3, 11, 0.5);
    let tree = MsuTreeTrainer::new(params()).train(&ds).unwrap();
    assert_eq!(tree.validate(), Ok(()));
    assert_eq!(tree.n_outputs(), 1);

    let targets = ds.targets();
    let mean = targets.mean().unwrap();
    let variance = targets.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / targets.len() as f64;

    let predictions = tree.predict_dataset(&ds);
    let mse = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, y)| (p - y).powi(2))
        .sum::<f64>()
        / targets.len() as f64;

    assert!(mse < 0.5 * variance, "mse {mse} variance {variance}");
}

#[test]
fn regression_leaves_carry_target_stats() {
    let ds = random_regression(120, 2, 4, 0.0);
    let tree = MsuTreeTrainer::new(params()).train(&ds).unwrap();

    let mut total = 0.0;
    for node in tree.nodes() {
        let TreeNode::Leaf(leaf) = node else {
            continue;
        };
        if let ClassDistribution::Observed(mean) = &leaf.distribution {
            assert_eq!(mean.len(), 1);
            let stats = leaf.stats.expect("numeric leaves carry stats");
            assert!(stats.variance >= -1e-9);
            total += stats.weight;
        }
    }
    assert!((total - 120.0).abs() < 1e-6);
}

#[test]
fn max_depth_bounds_regression_tree() {
    let ds = random_regression(200, 4, 8, 1.0);
    let params = TreeParams::builder()
        .do_not_check_capabilities(true)
        .max_depth(3)
        .build()
        .unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
    assert!(tree.depth() <= 3);
    assert!(tree.n_leaves() > 1);
}
