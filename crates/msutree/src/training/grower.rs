//! Recursive tree induction.
//!
//! [`TreeGrower`] builds the tree depth-first. At each node it:
//!
//! 1. returns an unobserved leaf for an empty subset
//! 2. applies the stopping tests (weight, purity, variance, depth)
//! 3. builds the node's [`CategoricalView`] (nominal targets only)
//! 4. draws candidates from the shared [`AttributeWindow`] and scores each one,
//!    by MSU of the ancestor path plus the candidate for nominal targets and
//!    by variance reduction for numeric targets
//! 5. splits on the best candidate if its score is positive and recurses
//!
//! Candidates are drawn until `K` have been examined *and* one of them scored
//! above zero, or the window runs dry.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

use super::msu::UncertaintyOracle;
use super::params::TreeParams;
use super::path::SelectedPath;
use super::split::{nominal_target_split, numeric_target_split, split_subset, AttributeSplit};
use super::window::AttributeWindow;
use crate::data::{AdapterError, CategoricalView, Dataset, InstanceSubset};
use crate::repr::{ClassDistribution, InternalNode, LeafNode, NodeId, Split, TargetStats, TreeNode};
use crate::utils::{eq, gr, max_index, single_variance};

/// Per-tree growth state.
pub struct TreeGrower<'a, O> {
    dataset: &'a Dataset,
    params: &'a TreeParams,
    oracle: &'a O,
    /// Resolved number of candidates per node.
    n_candidates: usize,
    /// Absolute variance threshold for numeric targets.
    min_variance: f64,
    rng: Xoshiro256PlusPlus,
    nodes: Vec<TreeNode>,
}

impl<'a, O: UncertaintyOracle> TreeGrower<'a, O> {
    /// Create a grower.
    ///
    /// # Arguments
    ///
    /// * `n_candidates` - Resolved `K`, see [`TreeParams::resolve_k`]
    /// * `min_variance` - `min_variance_prop` times the training variance
    ///   (ignored for nominal targets)
    pub fn new(
        dataset: &'a Dataset,
        params: &'a TreeParams,
        oracle: &'a O,
        n_candidates: usize,
        min_variance: f64,
    ) -> Self {
        Self {
            dataset,
            params,
            oracle,
            n_candidates,
            min_variance,
            rng: Xoshiro256PlusPlus::seed_from_u64(params.seed),
            nodes: Vec::new(),
        }
    }

    /// Grow a tree from `subset` and return its nodes, root first.
    ///
    /// # Arguments
    ///
    /// * `subset` - Instances reaching the root
    /// * `class_probs` - Per-class weights (nominal target) or `[mean]` (numeric target)
    /// * `window` - Attribute window shared by every node of this tree
    /// * `total_weight` - Root weight (numeric targets; recomputed for nominal)
    pub fn grow(
        mut self,
        subset: &InstanceSubset,
        class_probs: Vec<f64>,
        window: &mut AttributeWindow,
        total_weight: f64,
    ) -> Result<Vec<TreeNode>, AdapterError> {
        self.build_node(subset, class_probs, window, total_weight, 0, &SelectedPath::root())?;
        Ok(self.nodes)
    }

    fn build_node(
        &mut self,
        subset: &InstanceSubset,
        class_probs: Vec<f64>,
        window: &mut AttributeWindow,
        total_weight: f64,
        depth: usize,
        path: &SelectedPath,
    ) -> Result<NodeId, AdapterError> {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(TreeNode::unobserved());

        if subset.is_empty() {
            debug!(depth, "empty subset, unobserved leaf");
            return Ok(id);
        }

        let nominal = self.dataset.has_nominal_target();
        let (prior_variance, total_weight) = if nominal {
            (0.0, class_probs.iter().sum())
        } else {
            (self.prior_variance(subset), total_weight)
        };

        if let Some(reason) = self.stop_reason(&class_probs, prior_variance, total_weight, depth)
        {
            debug!(depth, total_weight, reason, "leaf");
            self.nodes[id as usize] = leaf(class_probs, prior_variance, total_weight, nominal);
            return Ok(id);
        }

        let view = if nominal {
            Some(CategoricalView::from_subset(self.dataset, subset)?)
        } else {
            None
        };
        let mut trial = path.with_free_slot();

        let mut best_score = -f64::MAX;
        let mut best_attribute = 0;
        let mut best: Option<(AttributeSplit, SelectedPath)> = None;
        let mut gain_found = false;
        let mut budget = self.n_candidates;

        let mut cursor = window.cursor();
        loop {
            if cursor.live() == 0 {
                break;
            }
            let within_budget = budget > 0;
            budget = budget.saturating_sub(1);
            if !within_budget && gain_found {
                break;
            }
            let Some(attribute) = cursor.draw(&mut self.rng) else {
                break;
            };

            let split = if nominal {
                nominal_target_split(self.dataset, subset, attribute)
            } else {
                numeric_target_split(self.dataset, subset, attribute)
            };

            let score = match &view {
                Some(view) => {
                    let name = &self.dataset.schema().attribute(attribute).name;
                    trial.fill_last(view.find_column_index(name)?);
                    if split.is_degenerate() {
                        0.0
                    } else {
                        self.oracle.score(
                            view.data(),
                            view.cardinalities(),
                            trial.columns(),
                            view.labels(),
                            view.n_labels(),
                        )
                    }
                }
                None if split.is_degenerate() => 0.0,
                None => split.gain,
            };
            trace!(depth, attribute, score, "candidate");

            if gr(score, 0.0) {
                gain_found = true;
            }
            if score > best_score
                || (!self.params.break_ties_randomly
                    && score == best_score
                    && attribute < best_attribute)
            {
                best_score = score;
                best_attribute = attribute;
                best = Some((split, trial.clone()));
            }
        }
        drop(cursor);

        let (split, best_path) = match best {
            Some(best) if gr(best_score, 0.0) => best,
            _ => {
                debug!(depth, total_weight, reason = "no positive score", "leaf");
                self.nodes[id as usize] = leaf(class_probs, prior_variance, total_weight, nominal);
                return Ok(id);
            }
        };

        debug!(depth, attribute = split.attribute, score = best_score, "split");

        let child_subsets = split_subset(self.dataset, subset, &split);
        let mut children = Vec::with_capacity(child_subsets.len());
        for (i, child_subset) in child_subsets.iter().enumerate() {
            let child_weight = if nominal { 0.0 } else { split.subset_weights[i] };
            let child = self.build_node(
                child_subset,
                split.distributions[i].clone(),
                window,
                child_weight,
                depth + 1,
                &best_path,
            )?;
            children.push(child);
        }

        let fallback = if children
            .iter()
            .any(|&c| self.nodes[c as usize].is_unobserved_leaf())
        {
            ClassDistribution::Observed(class_probs)
        } else {
            ClassDistribution::Unobserved
        };

        let meta = self.dataset.schema().attribute(split.attribute);
        let descriptor = if meta.is_nominal() {
            Split::Nominal {
                attribute: split.attribute,
                n_categories: meta.kind.n_categories(),
            }
        } else {
            Split::Numeric {
                attribute: split.attribute,
                threshold: split.split_point,
            }
        };

        self.nodes[id as usize] = TreeNode::Internal(InternalNode {
            split: descriptor,
            proportions: split.proportions,
            children,
            fallback,
        });
        Ok(id)
    }

    /// Weighted sum of squared deviations of the target over `subset`.
    fn prior_variance(&self, subset: &InstanceSubset) -> f64 {
        let (mut sum, mut sum_squared, mut weight) = (0.0, 0.0, 0.0);
        for (row, w) in subset.iter() {
            let y = self.dataset.target(row);
            sum += y * w;
            sum_squared += y * y * w;
            weight += w;
        }
        single_variance(sum, sum_squared, weight)
    }

    fn stop_reason(
        &self,
        class_probs: &[f64],
        prior_variance: f64,
        total_weight: f64,
        depth: usize,
    ) -> Option<&'static str> {
        let nominal = self.dataset.has_nominal_target();
        if total_weight < 2.0 * self.params.min_instances {
            Some("min_instances")
        } else if nominal && eq(class_probs[max_index(class_probs)], total_weight) {
            Some("pure")
        } else if !nominal && prior_variance / total_weight < self.min_variance {
            Some("min_variance")
        } else if self.params.max_depth > 0 && depth >= self.params.max_depth {
            Some("max_depth")
        } else {
            None
        }
    }
}

fn leaf(class_probs: Vec<f64>, prior_variance: f64, total_weight: f64, nominal: bool) -> TreeNode {
    let stats = (!nominal).then_some(TargetStats {
        variance: prior_variance,
        weight: total_weight,
    });
    TreeNode::Leaf(LeafNode {
        distribution: ClassDistribution::Observed(class_probs),
        stats,
    })
}
