//! Trained MSU tree.
//!
//! - [`MsuTree`]: arena of [`TreeNode`]s (root = node 0) plus the schema it was trained on
//! - [`TreeValidationError`]: structural validation errors

use std::fmt;

use ndarray::Array1;

use super::node::{ClassDistribution, Split, TreeNode};
use super::NodeId;
use crate::data::{Dataset, DatasetSchema};
use crate::utils::{max_index, normalize};

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`MsuTree`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,

    #[error("node {node} references child {child}, but the tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        child: NodeId,
        n_nodes: usize,
    },

    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },

    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },

    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },

    #[error("node {node} splits on unknown attribute {attribute}")]
    UnknownAttribute { node: NodeId, attribute: usize },

    #[error("node {node} has {got} children, its split needs {expected}")]
    ChildCountMismatch {
        node: NodeId,
        expected: usize,
        got: usize,
    },

    #[error("node {node} has {got} proportions for {expected} children")]
    ProportionsLenMismatch {
        node: NodeId,
        expected: usize,
        got: usize,
    },

    #[error("node {node} has proportions summing to {sum}")]
    InvalidProportions { node: NodeId, sum: f64 },

    #[error("node {node} stores a distribution of length {got}, expected {expected}")]
    DistributionLenMismatch {
        node: NodeId,
        expected: usize,
        got: usize,
    },
}

// ============================================================================
// MsuTree
// ============================================================================

/// A trained tree.
///
/// Nodes live in one arena, children referenced by [`NodeId`]. Node 0 is the
/// root; a parent always precedes its children.
#[derive(Debug, Clone)]
pub struct MsuTree {
    nodes: Vec<TreeNode>,
    schema: DatasetSchema,
    allow_unclassified: bool,
}

impl MsuTree {
    /// Create a tree from its nodes (root first).
    pub fn new(nodes: Vec<TreeNode>, schema: DatasetSchema, allow_unclassified: bool) -> Self {
        Self {
            nodes,
            schema,
            allow_unclassified,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[inline]
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Length of a prediction vector: number of classes, or 1 for a numeric target.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        if self.has_nominal_target() {
            self.schema.n_classes()
        } else {
            1
        }
    }

    #[inline]
    fn has_nominal_target(&self) -> bool {
        self.schema.target().is_nominal()
    }

    /// Total number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path (0 for a single leaf).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0 as NodeId, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in self.node(id).children() {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Class probabilities (nominal target) or `[mean]` (numeric target) for
    /// one instance.
    ///
    /// `values` holds one value per predictor, NaN for missing. Returns `None`
    /// when the instance ends in a branch no training instance reached and
    /// unclassified instances are not allowed.
    pub fn predict_proba(&self, values: &[f64]) -> Option<Vec<f64>> {
        debug_assert_eq!(values.len(), self.schema.n_attributes());
        self.distribution(0, values)
    }

    /// Predicted class index (nominal target) or value (numeric target).
    pub fn predict(&self, values: &[f64]) -> Option<f64> {
        let dist = self.predict_proba(values)?;
        if self.has_nominal_target() {
            Some(max_index(&dist) as f64)
        } else {
            dist.first().copied()
        }
    }

    /// [`predict`](Self::predict) for every instance of `dataset`; NaN where
    /// no prediction is made.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Array1<f64> {
        let mut values = vec![0.0; dataset.n_attributes()];
        Array1::from_shape_fn(dataset.n_instances(), |row| {
            for (attribute, value) in values.iter_mut().enumerate() {
                *value = dataset.value(attribute, row);
            }
            self.predict(&values).unwrap_or(f64::NAN)
        })
    }

    fn distribution(&self, id: NodeId, values: &[f64]) -> Option<Vec<f64>> {
        let (own, returned) = match self.node(id) {
            TreeNode::Leaf(leaf) => (&leaf.distribution, None),
            TreeNode::Internal(node) => {
                let value = values[node.split.attribute()];
                let returned = if value.is_nan() {
                    let mut acc = vec![0.0; self.n_outputs()];
                    for (&child, &p) in node.children.iter().zip(&node.proportions) {
                        if let Some(child_dist) = self.distribution(child, values) {
                            for (a, d) in acc.iter_mut().zip(child_dist) {
                                *a += p * d;
                            }
                        }
                    }
                    Some(acc)
                } else {
                    node.children
                        .get(node.split.child_index(value))
                        .and_then(|&child| self.distribution(child, values))
                };
                (&node.fallback, returned)
            }
        };

        if returned.is_some() {
            return returned;
        }

        match own {
            ClassDistribution::Observed(dist) => {
                let mut dist = dist.clone();
                if self.has_nominal_target() {
                    normalize(&mut dist);
                }
                Some(dist)
            }
            ClassDistribution::Unobserved if self.allow_unclassified => {
                if self.has_nominal_target() {
                    Some(vec![0.0; self.n_outputs()])
                } else {
                    Some(vec![f64::NAN])
                }
            }
            ClassDistribution::Unobserved => None,
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check structural invariants.
    ///
    /// Every node is reached exactly once from the root, internal nodes have
    /// as many children as their split has outcomes, proportions match the
    /// children and sum to 1, and stored distributions have
    /// [`n_outputs`](Self::n_outputs) entries.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.nodes.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }
        let n_outputs = self.n_outputs();

        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;

            let stored = match &self.nodes[idx] {
                TreeNode::Leaf(leaf) => &leaf.distribution,
                TreeNode::Internal(internal) => {
                    let attribute = internal.split.attribute();
                    if attribute >= self.schema.n_attributes() {
                        return Err(TreeValidationError::UnknownAttribute { node, attribute });
                    }

                    let expected = match internal.split {
                        Split::Nominal { .. } => {
                            self.schema.attribute(attribute).kind.n_categories()
                        }
                        Split::Numeric { .. } => 2,
                    };
                    let got = internal.children.len();
                    if got != expected || got < 2 {
                        return Err(TreeValidationError::ChildCountMismatch {
                            node,
                            expected,
                            got,
                        });
                    }
                    if internal.proportions.len() != got {
                        return Err(TreeValidationError::ProportionsLenMismatch {
                            node,
                            expected: got,
                            got: internal.proportions.len(),
                        });
                    }
                    let sum: f64 = internal.proportions.iter().sum();
                    if (sum - 1.0).abs() > 1e-6 {
                        return Err(TreeValidationError::InvalidProportions { node, sum });
                    }

                    for &child in internal.children.iter().rev() {
                        if child == node {
                            return Err(TreeValidationError::SelfLoop { node });
                        }
                        if child as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                child,
                                n_nodes,
                            });
                        }
                        stack.push(child);
                    }
                    &internal.fallback
                }
            };

            if let Some(dist) = stored.values() {
                if dist.len() != n_outputs {
                    return Err(TreeValidationError::DistributionLenMismatch {
                        node,
                        expected: n_outputs,
                        got: dist.len(),
                    });
                }
            }
        }

        if let Some(i) = visited.iter().position(|&v| !v) {
            return Err(TreeValidationError::UnreachableNode { node: i as NodeId });
        }

        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, level: usize) -> fmt::Result {
        let internal = match self.node(id) {
            TreeNode::Leaf(_) => return self.fmt_leaf(f, id),
            TreeNode::Internal(internal) => internal,
        };
        let meta = self.schema.attribute(internal.split.attribute());

        for (i, &child) in internal.children.iter().enumerate() {
            writeln!(f)?;
            for _ in 0..level {
                f.write_str("|   ")?;
            }
            match internal.split {
                Split::Nominal { .. } => {
                    let category = meta.kind.categories().get(i).map_or("?", String::as_str);
                    write!(f, "{} = {}", meta.name, category)?;
                }
                Split::Numeric { threshold, .. } => {
                    let op = if i == 0 { "<" } else { ">=" };
                    write!(f, "{} {} {}", meta.name, op, fmt_number(threshold))?;
                }
            }
            self.fmt_subtree(f, child, level + 1)?;
        }
        Ok(())
    }

    fn fmt_leaf(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let TreeNode::Leaf(leaf) = self.node(id) else {
            return Ok(());
        };

        if self.has_nominal_target() {
            let dist = leaf.distribution.values().unwrap_or(&[]);
            let sum: f64 = dist.iter().sum();
            let best = max_index(dist);
            let max_count = dist.get(best).copied().unwrap_or(0.0);
            let class = self
                .schema
                .target()
                .kind
                .categories()
                .get(best)
                .map_or("?", String::as_str);
            write!(
                f,
                " : {} ({}/{})",
                class,
                fmt_number(sum),
                fmt_number(sum - max_count)
            )
        } else {
            let mean = leaf
                .distribution
                .values()
                .and_then(|d| d.first().copied())
                .unwrap_or(0.0);
            let (weight, avg_error) = match leaf.stats {
                Some(stats) if stats.weight > 0.0 => (stats.weight, stats.variance / stats.weight),
                Some(stats) => (stats.weight, 0.0),
                None => (0.0, 0.0),
            };
            write!(
                f,
                " : {} ({}/{})",
                fmt_number(mean),
                fmt_number(weight),
                fmt_number(avg_error)
            )
        }
    }
}

/// Two decimals, trailing zeros dropped.
fn fmt_number(x: f64) -> String {
    let s = format!("{x:.2}");
    if s.contains('.') {
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    } else {
        s
    }
}

impl fmt::Display for MsuTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MsuTree")?;
        writeln!(f, "=======")?;
        self.fmt_subtree(f, 0, 0)?;
        writeln!(f)?;
        writeln!(f)?;
        write!(f, "Size of the tree : {}", self.n_nodes())
    }
}
