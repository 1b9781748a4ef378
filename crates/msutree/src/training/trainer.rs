//! MSU tree trainer.
//!
//! Validates parameters and data, prepares root statistics and the attribute
//! window, and runs the [`TreeGrower`]. Use [`MsuTreeTrainer::train`] on a
//! whole dataset or [`MsuTreeTrainer::train_subset`] on a weighted view of one
//! (for example a bootstrap sample drawn by an ensemble).

use tracing::info;

use super::capabilities::{Capabilities, CapabilityError};
use super::grower::TreeGrower;
use super::msu::{MultivariateSymmetricalUncertainty, UncertaintyOracle};
use super::params::{ConfigError, TreeParams};
use super::window::AttributeWindow;
use crate::data::{AdapterError, Dataset, InstanceSubset};
use crate::repr::{ClassDistribution, LeafNode, MsuTree, TargetStats, TreeNode};
use crate::utils::single_variance;

/// Training failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("subset row {row} is out of range for a dataset with {n_instances} instances")]
    RowOutOfRange { row: usize, n_instances: usize },
}

/// Trains single MSU trees.
///
/// # Example
///
/// ```
/// use msutree::testing::correlated_nominal;
/// use msutree::training::{MsuTreeTrainer, TreeParams};
///
/// let dataset = correlated_nominal();
/// let params = TreeParams::builder().n_candidates(2).build().unwrap();
/// let tree = MsuTreeTrainer::new(params).train(&dataset).unwrap();
///
/// assert_eq!(tree.n_leaves(), 2);
/// assert_eq!(tree.predict(&[1.0, 3.0]), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct MsuTreeTrainer<O = MultivariateSymmetricalUncertainty> {
    params: TreeParams,
    oracle: O,
}

impl MsuTreeTrainer {
    /// Create a trainer scoring candidates with MSU.
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            oracle: MultivariateSymmetricalUncertainty,
        }
    }
}

impl<O: UncertaintyOracle> MsuTreeTrainer<O> {
    /// Create a trainer with a custom uncertainty oracle.
    pub fn with_oracle(params: TreeParams, oracle: O) -> Self {
        Self { params, oracle }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Train on every instance of `dataset`.
    pub fn train(&self, dataset: &Dataset) -> Result<MsuTree, TrainError> {
        self.train_subset(dataset, &InstanceSubset::all(dataset))
    }

    /// Train on the weighted instances of `subset`.
    ///
    /// Instances with a missing target are dropped first.
    ///
    /// # Errors
    ///
    /// - [`TrainError::Config`] for invalid parameters
    /// - [`TrainError::Capability`] if the dataset is not supported (unless
    ///   `do_not_check_capabilities` is set)
    /// - [`TrainError::Adapter`] if a node's categorical view cannot be built
    /// - [`TrainError::RowOutOfRange`] if `subset` refers to unknown rows
    pub fn train_subset(
        &self,
        dataset: &Dataset,
        subset: &InstanceSubset,
    ) -> Result<MsuTree, TrainError> {
        self.params.validate()?;
        if !self.params.do_not_check_capabilities {
            Capabilities::msu_tree().check(dataset)?;
        }

        let n_instances = dataset.n_instances();
        let mut known = InstanceSubset::with_capacity(subset.len());
        for (row, weight) in subset.iter() {
            if row >= n_instances {
                return Err(TrainError::RowOutOfRange { row, n_instances });
            }
            if !dataset.target(row).is_nan() {
                known.push(row as u32, weight);
            }
        }

        let n_predictors = dataset.n_attributes();
        let n_candidates = self.params.resolve_k(n_predictors);
        info!(
            instances = known.len(),
            predictors = n_predictors,
            k = n_candidates,
            "training MSU tree"
        );

        let stats = RootStats::compute(dataset, &known);
        let min_variance = self.params.min_variance_prop * stats.train_variance;

        let nodes = if n_predictors == 0 {
            vec![stats.majority_leaf(&known, dataset.has_nominal_target())]
        } else {
            let mut window = AttributeWindow::new(n_predictors);
            TreeGrower::new(dataset, &self.params, &self.oracle, n_candidates, min_variance).grow(
                &known,
                stats.class_probs,
                &mut window,
                stats.total_weight,
            )?
        };

        let tree = MsuTree::new(nodes, dataset.schema().clone(), self.params.allow_unclassified);
        info!(
            nodes = tree.n_nodes(),
            leaves = tree.n_leaves(),
            depth = tree.depth(),
            "finished training"
        );
        Ok(tree)
    }
}

/// Target statistics over the root subset.
struct RootStats {
    /// Per-class weights, or `[mean]` for a numeric target.
    class_probs: Vec<f64>,
    total_weight: f64,
    /// Weighted sum of squared deviations (numeric target).
    variance: f64,
    /// Per-weight variance (numeric target).
    train_variance: f64,
}

impl RootStats {
    fn compute(dataset: &Dataset, subset: &InstanceSubset) -> Self {
        if dataset.has_nominal_target() {
            let mut class_probs = vec![0.0; dataset.n_classes()];
            for (row, weight) in subset.iter() {
                class_probs[dataset.class_code(row)] += weight;
            }
            let total_weight = class_probs.iter().sum();
            return Self {
                class_probs,
                total_weight,
                variance: 0.0,
                train_variance: 0.0,
            };
        }

        let (mut sum, mut sum_squared, mut total_weight) = (0.0, 0.0, 0.0);
        for (row, weight) in subset.iter() {
            let y = dataset.target(row);
            sum += y * weight;
            sum_squared += y * y * weight;
            total_weight += weight;
        }
        let variance = single_variance(sum, sum_squared, total_weight);
        Self {
            class_probs: vec![sum / total_weight],
            total_weight,
            variance,
            train_variance: variance / total_weight,
        }
    }

    /// Single-leaf model for data without predictors.
    fn majority_leaf(&self, subset: &InstanceSubset, nominal: bool) -> TreeNode {
        if subset.is_empty() {
            return TreeNode::unobserved();
        }
        TreeNode::Leaf(LeafNode {
            distribution: ClassDistribution::Observed(self.class_probs.clone()),
            stats: (!nominal).then_some(TargetStats {
                variance: self.variance,
                weight: self.total_weight,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::correlated_nominal;
    use ndarray::array;

    #[test]
    fn rejects_invalid_params() {
        let ds = correlated_nominal();
        let params = TreeParams {
            min_instances: -2.0,
            ..TreeParams::default()
        };
        let err = MsuTreeTrainer::new(params).train(&ds).unwrap_err();
        assert_eq!(err, TrainError::Config(ConfigError::InvalidMinInstances(-2.0)));
    }

    #[test]
    fn rejects_out_of_range_subset() {
        let ds = correlated_nominal();
        let subset = InstanceSubset::from_parts(vec![0, 99], vec![1.0, 1.0]);
        let err = MsuTreeTrainer::new(TreeParams::default())
            .train_subset(&ds, &subset)
            .unwrap_err();
        assert_eq!(err, TrainError::RowOutOfRange { row: 99, n_instances: 8 });
    }

    #[test]
    fn no_predictors_gives_majority_leaf() {
        let ds = Dataset::builder()
            .nominal_target("y", ["a", "b"], array![0.0, 1.0, 1.0].view())
            .build()
            .unwrap();
        let tree = MsuTreeTrainer::new(TreeParams::default()).train(&ds).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        let probs = tree.predict_proba(&[]).unwrap();
        assert!((probs[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn missing_targets_are_dropped() {
        let ds = Dataset::builder()
            .add_nominal("c", ["a", "b"], array![0.0, 0.0, 1.0, 1.0].view())
            .nominal_target("y", ["n", "p"], array![0.0, 0.0, 1.0, f64::NAN].view())
            .build()
            .unwrap();
        let params = TreeParams::builder()
            .do_not_check_capabilities(true)
            .build()
            .unwrap();
        let tree = MsuTreeTrainer::new(params).train(&ds).unwrap();
        // Two instances of class n at c = a, one of class p at c = b.
        let TreeNode::Internal(root) = tree.root() else {
            panic!("root should split");
        };
        let TreeNode::Leaf(leaf) = tree.node(root.children[1]) else {
            panic!("expected leaf");
        };
        assert_eq!(leaf.distribution, ClassDistribution::Observed(vec![0.0, 1.0]));
    }
}
