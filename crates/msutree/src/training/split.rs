//! Per-attribute split search and instance partitioning.
//!
//! For one candidate attribute these routines compute the branch
//! distributions a split would produce:
//!
//! - nominal attribute: one branch per category
//! - numeric attribute: two branches, `value < split_point` and the rest,
//!   at the boundary that maximises information gain (nominal target) or
//!   minimises within-branch variance (numeric target)
//!
//! Instances with a missing value are held back, then added to every branch
//! in proportion to the branch weights.

use crate::data::{Dataset, InstanceSubset};
use crate::utils::{
    entropy_conditioned_on_rows, entropy_over_columns, eq, normalize, single_variance, variance,
};

// =============================================================================
// AttributeSplit
// =============================================================================

/// The split of a node's instances on one attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSplit {
    /// Attribute id.
    pub attribute: usize,

    /// Threshold for numeric attributes; NaN for nominal attributes or when
    /// the attribute has no boundary between distinct values.
    pub split_point: f64,

    /// Per-branch distributions, missing values included: class weights for
    /// a nominal target, `[mean]` for a numeric target.
    pub distributions: Vec<Vec<f64>>,

    /// Per-branch share of the known-value weight; sums to 1.
    pub proportions: Vec<f64>,

    /// Per-branch weight from instances with a known value.
    pub known_weights: Vec<f64>,

    /// Per-branch total weight, missing values included. Numeric targets only.
    pub subset_weights: Vec<f64>,

    /// Information gain (nominal target) or variance reduction (numeric target).
    pub gain: f64,
}

impl AttributeSplit {
    #[inline]
    pub fn n_branches(&self) -> usize {
        self.distributions.len()
    }

    /// Returns true if fewer than two branches receive known-value weight.
    ///
    /// Such a split does not separate any instances.
    pub fn is_degenerate(&self) -> bool {
        self.known_weights.iter().filter(|&&w| w > 0.0).count() < 2
    }
}

/// Branch proportions from branch weights; uniform if the weights sum to zero.
fn proportions(weights: &[f64]) -> Vec<f64> {
    let mut props = weights.to_vec();
    if eq(props.iter().sum(), 0.0) {
        let n = props.len() as f64;
        props.iter_mut().for_each(|p| *p = 1.0 / n);
    } else {
        normalize(&mut props);
    }
    props
}

/// Known-value rows of `subset` for `attribute`, sorted by value, plus the
/// rows with a missing value.
fn sorted_known(
    dataset: &Dataset,
    subset: &InstanceSubset,
    attribute: usize,
) -> (Vec<(f64, usize, f64)>, Vec<(usize, f64)>) {
    let mut known = Vec::with_capacity(subset.len());
    let mut missing = Vec::new();
    for (row, weight) in subset.iter() {
        let value = dataset.value(attribute, row);
        if value.is_nan() {
            missing.push((row, weight));
        } else {
            known.push((value, row, weight));
        }
    }
    known.sort_by(|a, b| a.0.total_cmp(&b.0));
    (known, missing)
}

// =============================================================================
// Nominal target
// =============================================================================

/// Split on `attribute` for a nominal target.
pub fn nominal_target_split(
    dataset: &Dataset,
    subset: &InstanceSubset,
    attribute: usize,
) -> AttributeSplit {
    let n_classes = dataset.n_classes();
    let meta = dataset.schema().attribute(attribute);

    let mut split_point = f64::NAN;
    let mut missing = Vec::new();

    let mut dist = if meta.is_nominal() {
        let mut dist = vec![vec![0.0; n_classes]; meta.kind.n_categories()];
        for (row, weight) in subset.iter() {
            let value = dataset.value(attribute, row);
            if value.is_nan() {
                missing.push((row, weight));
            } else {
                dist[value as usize][dataset.class_code(row)] += weight;
            }
        }
        dist
    } else {
        let (known, held_back) = sorted_known(dataset, subset, attribute);
        missing = held_back;

        let mut current = vec![vec![0.0; n_classes]; 2];
        for &(_, row, weight) in &known {
            current[1][dataset.class_code(row)] += weight;
        }
        let prior = entropy_over_columns(&current);
        let mut dist = current.clone();

        if let Some(&(first, _, _)) = known.first() {
            let mut current_split = first;
            let mut best_gain = -f64::MAX;
            for &(value, row, weight) in &known {
                if value > current_split {
                    let gain = prior - entropy_conditioned_on_rows(&current);
                    if gain > best_gain {
                        best_gain = gain;
                        split_point = (value + current_split) / 2.0;
                        if split_point <= current_split {
                            split_point = value;
                        }
                        dist.clone_from(&current);
                    }
                    current_split = value;
                }
                let class = dataset.class_code(row);
                current[0][class] += weight;
                current[1][class] -= weight;
            }
        }
        dist
    };

    let known_weights: Vec<f64> = dist.iter().map(|d| d.iter().sum()).collect();
    let props = proportions(&known_weights);

    for (row, weight) in missing {
        let class = dataset.class_code(row);
        for (branch, &p) in dist.iter_mut().zip(&props) {
            branch[class] += p * weight;
        }
    }

    let gain = entropy_over_columns(&dist) - entropy_conditioned_on_rows(&dist);

    AttributeSplit {
        attribute,
        split_point,
        distributions: dist,
        proportions: props,
        known_weights,
        subset_weights: Vec::new(),
        gain,
    }
}

// =============================================================================
// Numeric target
// =============================================================================

/// Split on `attribute` for a numeric target.
pub fn numeric_target_split(
    dataset: &Dataset,
    subset: &InstanceSubset,
    attribute: usize,
) -> AttributeSplit {
    let meta = dataset.schema().attribute(attribute);
    let n_branches = if meta.is_nominal() {
        meta.kind.n_categories()
    } else {
        2
    };

    let mut sums = vec![0.0; n_branches];
    let mut sums_squared = vec![0.0; n_branches];
    let mut weights = vec![0.0; n_branches];
    let mut total_sum = 0.0;
    let mut total_sum_squared = 0.0;
    let mut total_weight = 0.0;

    let mut split_point = f64::NAN;
    let mut missing = Vec::new();

    if meta.is_nominal() {
        for (row, weight) in subset.iter() {
            let value = dataset.value(attribute, row);
            if value.is_nan() {
                missing.push((row, weight));
                continue;
            }
            let y = dataset.target(row);
            let branch = value as usize;
            sums[branch] += y * weight;
            sums_squared[branch] += y * y * weight;
            weights[branch] += weight;
            total_sum += y * weight;
            total_sum_squared += y * y * weight;
            total_weight += weight;
        }
    } else {
        let (known, held_back) = sorted_known(dataset, subset, attribute);
        missing = held_back;

        for &(_, row, weight) in &known {
            let y = dataset.target(row);
            sums[1] += y * weight;
            sums_squared[1] += y * y * weight;
            weights[1] += weight;
        }
        total_sum = sums[1];
        total_sum_squared = sums_squared[1];
        total_weight = weights[1];

        let mut current_sums = sums.clone();
        let mut current_sums_squared = sums_squared.clone();
        let mut current_weights = weights.clone();

        if let Some(&(first, _, _)) = known.first() {
            let mut current_split = first;
            let mut best_variance = f64::MAX;
            for &(value, row, weight) in &known {
                if value > current_split {
                    let current =
                        variance(&current_sums, &current_sums_squared, &current_weights);
                    if current < best_variance {
                        best_variance = current;
                        split_point = (value + current_split) / 2.0;
                        if split_point <= current_split {
                            split_point = value;
                        }
                        sums.clone_from(&current_sums);
                        sums_squared.clone_from(&current_sums_squared);
                        weights.clone_from(&current_weights);
                    }
                }
                current_split = value;

                let y = dataset.target(row);
                current_sums[0] += y * weight;
                current_sums_squared[0] += y * y * weight;
                current_weights[0] += weight;
                current_sums[1] -= y * weight;
                current_sums_squared[1] -= y * y * weight;
                current_weights[1] -= weight;
            }
        }
    }

    let known_weights = weights.clone();
    let props = proportions(&weights);

    for (row, weight) in missing {
        let y = dataset.target(row);
        for (branch, &p) in props.iter().enumerate() {
            sums[branch] += p * y * weight;
            sums_squared[branch] += p * y * y * weight;
            weights[branch] += p * weight;
        }
        total_sum += y * weight;
        total_sum_squared += y * y * weight;
        total_weight += weight;
    }

    let parent_mean = total_sum / total_weight;
    let distributions = sums
        .iter()
        .zip(&weights)
        .map(|(&s, &w)| vec![if w > 0.0 { s / w } else { parent_mean }])
        .collect();

    let prior = single_variance(total_sum, total_sum_squared, total_weight);
    let gain = prior - variance(&sums, &sums_squared, &weights);

    AttributeSplit {
        attribute,
        split_point,
        distributions,
        proportions: props,
        known_weights,
        subset_weights: weights,
        gain,
    }
}

// =============================================================================
// Partitioning
// =============================================================================

/// Partition `subset` into one subset per branch of `split`.
///
/// Nominal attributes route by category code, numeric attributes send
/// `value < split_point` to branch 0 and everything else to branch 1. An
/// instance with a missing value goes to every branch with a positive
/// proportion, its weight scaled by that proportion.
pub fn split_subset(
    dataset: &Dataset,
    subset: &InstanceSubset,
    split: &AttributeSplit,
) -> Vec<InstanceSubset> {
    let attribute = split.attribute;
    let nominal = dataset.schema().attribute(attribute).is_nominal();
    let mut children = vec![InstanceSubset::new(); split.n_branches()];

    for (row, weight) in subset.iter() {
        let value = dataset.value(attribute, row);
        if value.is_nan() {
            for (child, &p) in children.iter_mut().zip(&split.proportions) {
                if p > 0.0 {
                    child.push(row as u32, p * weight);
                }
            }
        } else if nominal {
            children[value as usize].push(row as u32, weight);
        } else if value < split.split_point {
            children[0].push(row as u32, weight);
        } else {
            children[1].push(row as u32, weight);
        }
    }

    children
}
