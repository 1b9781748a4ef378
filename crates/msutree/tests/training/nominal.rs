use approx::assert_abs_diff_eq;
use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use msutree::data::{AdapterError, AttributeMeta};
use msutree::repr::{ClassDistribution, Split, TreeNode};
use msutree::testing::{correlated_nominal, random_classification, xor_dataset};
use msutree::training::{CapabilityError, MsuTreeTrainer, TrainError, TreeParams};
use msutree::Dataset;

use super::init_tracing;

fn builder() -> msutree::training::TreeParamsBuilder {
    TreeParams::builder()
}

#[test]
fn correlated_nominal_attribute_gives_two_pure_leaves() {
    init_tracing();
    let ds = correlated_nominal();
    let params = builder().n_candidates(2).min_instances(1.0).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();

    let TreeNode::Internal(root) = tree.root() else {
        panic!("root should split");
    };
    assert_eq!(
        root.split,
        Split::Nominal {
            attribute: 0,
            n_categories: 2
        }
    );
    assert_eq!(tree.n_nodes(), 3);
    assert_eq!(tree.n_leaves(), 2);

    let leaves: Vec<_> = root
        .children
        .iter()
        .map(|&c| match tree.node(c) {
            TreeNode::Leaf(leaf) => leaf.distribution.clone(),
            TreeNode::Internal(_) => panic!("children should be leaves"),
        })
        .collect();
    assert_eq!(
        leaves,
        vec![
            ClassDistribution::Observed(vec![4.0, 0.0]),
            ClassDistribution::Observed(vec![0.0, 4.0])
        ]
    );
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn empty_training_set_gives_unobserved_leaf() {
    let empty = Array1::<f64>::zeros(0);
    let ds = Dataset::builder()
        .add_numeric("x", empty.view())
        .nominal_target("y", ["a", "b"], empty.view())
        .build()
        .unwrap();
    let params = builder().do_not_check_capabilities(true).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();

    assert_eq!(tree.n_nodes(), 1);
    assert!(tree.root().is_unobserved_leaf());
    assert_eq!(tree.predict_proba(&[1.0]), None);

    let params = builder()
        .do_not_check_capabilities(true)
        .allow_unclassified(true)
        .build()
        .unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
    assert_eq!(tree.predict_proba(&[1.0]), Some(vec![0.0, 0.0]));
}

#[test]
fn empty_training_set_is_rejected_by_capability_check() {
    let empty = Array1::<f64>::zeros(0);
    let ds = Dataset::builder()
        .add_numeric("x", empty.view())
        .nominal_target("y", ["a", "b"], empty.view())
        .build()
        .unwrap();
    let err = MsuTreeTrainer::new(TreeParams::default()).train(&ds).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Capability(CapabilityError::NotEnoughInstances { .. })
    ));
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn max_depth_one_gives_stump(#[case] seed: u64) {
    let ds = random_classification(200, 2, 2, 3, seed, 0.1, 0.0);
    let params = builder().max_depth(1).seed(seed).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();

    let TreeNode::Internal(root) = tree.root() else {
        panic!("root should split");
    };
    for &child in &root.children {
        assert!(tree.node(child).is_leaf());
    }
    assert_eq!(tree.depth(), 1);
}

#[test]
fn ties_go_to_lower_attribute_id() {
    // Two identical copies of the class.
    let y = array![0.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let ds = Dataset::builder()
        .add_nominal("first", ["a", "b"], y.view())
        .add_nominal("second", ["a", "b"], y.view())
        .nominal_target("y", ["a", "b"], y.view())
        .build()
        .unwrap();

    for seed in 0..20 {
        let params = builder().n_candidates(2).seed(seed).build().unwrap();
        let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
        let TreeNode::Internal(root) = tree.root() else {
            panic!("root should split");
        };
        assert_eq!(root.split.attribute(), 0, "seed {seed}");
    }
}

#[test]
fn ties_between_wide_identical_columns_go_to_lower_id() {
    let mut rng = StdRng::seed_from_u64(17);
    let rows = 2000;
    let wide: Array1<f64> = (0..rows).map(|_| rng.gen_range(0..7) as f64).collect();
    let other: Array1<f64> = (0..rows).map(|_| rng.gen_range(0..5) as f64).collect();
    let y: Array1<f64> = wide
        .iter()
        .map(|&w| {
            if rng.gen::<f64>() < 0.7 {
                (w as usize % 4) as f64
            } else {
                rng.gen_range(0..4) as f64
            }
        })
        .collect();

    let categories = ["a", "b", "c", "d", "e", "f", "g"];
    let ds = Dataset::builder()
        .add_nominal("first", categories, wide.view())
        .add_nominal("second", categories, wide.view())
        .add_nominal("other", ["p", "q", "r", "s", "t"], other.view())
        .nominal_target("y", ["y0", "y1", "y2", "y3"], y.view())
        .build()
        .unwrap();

    for seed in 0..30 {
        let params = builder().n_candidates(3).seed(seed).build().unwrap();
        let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
        let TreeNode::Internal(root) = tree.root() else {
            panic!("root should split");
        };
        assert_eq!(root.split.attribute(), 0, "seed {seed}");
    }
}

#[test]
fn random_tie_breaking_keeps_first_drawn() {
    let y = array![0.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let ds = Dataset::builder()
        .add_nominal("first", ["a", "b"], y.view())
        .add_nominal("second", ["a", "b"], y.view())
        .nominal_target("y", ["a", "b"], y.view())
        .build()
        .unwrap();

    let mut chosen = std::collections::HashSet::new();
    for seed in 0..32 {
        let params = builder()
            .n_candidates(2)
            .seed(seed)
            .break_ties_randomly(true)
            .build()
            .unwrap();
        let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
        let TreeNode::Internal(root) = tree.root() else {
            panic!("root should split");
        };
        chosen.insert(root.split.attribute());
    }
    assert_eq!(chosen.len(), 2);
}

#[test]
fn pure_node_is_a_leaf() {
    let ds = Dataset::builder()
        .add_nominal("c", ["a", "b"], array![0.0, 1.0, 0.0, 1.0].view())
        .add_numeric("x", array![1.0, 2.0, 3.0, 4.0].view())
        .nominal_target("y", ["a", "b"], array![1.0, 1.0, 1.0, 1.0].view())
        .build()
        .unwrap();
    let params = builder().min_instances(0.0).max_depth(0).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();

    assert_eq!(tree.n_nodes(), 1);
    assert_eq!(tree.predict_proba(&[0.0, 1.0]), Some(vec![0.0, 1.0]));
}

#[test]
fn same_seed_gives_identical_trees() {
    let ds = random_classification(300, 3, 3, 3, 9, 0.2, 0.0);
    let params = builder().seed(123).build().unwrap();

    let a = MsuTreeTrainer::new(params.clone()).train(&ds).unwrap();
    let b = MsuTreeTrainer::new(params).train(&ds).unwrap();

    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn interaction_is_found_through_the_path() {
    let ds = xor_dataset();
    let params = builder().n_candidates(2).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();

    for row in 0..ds.n_instances() {
        let values = [ds.value(0, row), ds.value(1, row)];
        assert_eq!(tree.predict(&values), Some(ds.target(row)));
    }
    assert_eq!(tree.depth(), 2);
}

#[test]
fn learns_structured_data() {
    init_tracing();
    let ds = random_classification(400, 2, 2, 3, 5, 0.0, 0.0);
    let tree = MsuTreeTrainer::new(TreeParams::default()).train(&ds).unwrap();
    assert_eq!(tree.validate(), Ok(()));

    let predictions = tree.predict_dataset(&ds);
    let correct = predictions
        .iter()
        .zip(ds.targets())
        .filter(|(p, y)| p == y)
        .count();
    assert!(correct as f64 / ds.n_instances() as f64 > 0.95);
}

#[test]
fn missing_values_need_capability_override() {
    let ds = random_classification(200, 2, 2, 2, 3, 0.1, 0.15);
    let err = MsuTreeTrainer::new(TreeParams::default()).train(&ds).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Capability(CapabilityError::MissingValues { .. })
    ));

    let params = builder().do_not_check_capabilities(true).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
    assert_eq!(tree.validate(), Ok(()));

    let values = vec![f64::NAN; ds.n_attributes()];
    let probs = tree.predict_proba(&values).unwrap();
    assert_abs_diff_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
}

#[test]
fn string_attribute_is_rejected() {
    let ds = Dataset::builder()
        .add_attribute(AttributeMeta::string("text"), array![0.0, 1.0, 2.0, 3.0].view())
        .nominal_target("y", ["a", "b"], array![0.0, 1.0, 0.0, 1.0].view())
        .build()
        .unwrap();

    let err = MsuTreeTrainer::new(TreeParams::default()).train(&ds).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Capability(CapabilityError::UnsupportedAttribute { .. })
    ));

    // Without the check, the categorical view refuses it.
    let params = builder().do_not_check_capabilities(true).build().unwrap();
    let err = MsuTreeTrainer::new(params).train(&ds).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Adapter(AdapterError::UnsupportedAttribute { .. })
    ));
}

#[test]
fn renders_tree_text() {
    let ds = correlated_nominal();
    let params = builder().n_candidates(2).build().unwrap();
    let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();

    assert_eq!(
        tree.to_string(),
        "MsuTree\n=======\n\nc = a : no (4/0)\nc = b : yes (4/0)\n\nSize of the tree : 3"
    );
}
