//! Tree node types.

use super::NodeId;

/// Class distribution stored at a node.
///
/// `Unobserved` marks a node that no training instance reached. It is kept
/// distinct from a zero vector so prediction can fall back to the parent.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassDistribution {
    /// Per-class weights (nominal target) or `[mean]` (numeric target).
    Observed(Vec<f64>),
    /// No instance reached this node.
    Unobserved,
}

impl ClassDistribution {
    /// The stored vector, if observed.
    #[inline]
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            ClassDistribution::Observed(values) => Some(values),
            ClassDistribution::Unobserved => None,
        }
    }
}

/// Target statistics of a numeric-target leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStats {
    /// Weighted sum of squared deviations from the mean.
    pub variance: f64,
    /// Total weight.
    pub weight: f64,
}

/// Split descriptor of an internal node.
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// One child per category of `attribute`.
    Nominal { attribute: usize, n_categories: usize },
    /// Child 0 for `value < threshold`, child 1 otherwise.
    Numeric { attribute: usize, threshold: f64 },
}

impl Split {
    #[inline]
    pub fn attribute(&self) -> usize {
        match *self {
            Split::Nominal { attribute, .. } | Split::Numeric { attribute, .. } => attribute,
        }
    }

    /// Number of children this split needs.
    #[inline]
    pub fn n_children(&self) -> usize {
        match *self {
            Split::Nominal { n_categories, .. } => n_categories,
            Split::Numeric { .. } => 2,
        }
    }

    /// Child index for a known `value`.
    #[inline]
    pub fn child_index(&self, value: f64) -> usize {
        match *self {
            Split::Nominal { .. } => value as usize,
            Split::Numeric { threshold, .. } => usize::from(value >= threshold),
        }
    }
}

/// A leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub distribution: ClassDistribution,
    /// Present for numeric targets only.
    pub stats: Option<TargetStats>,
}

/// An internal node.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalNode {
    pub split: Split,
    /// Share of training weight per child, used to route missing values.
    pub proportions: Vec<f64>,
    pub children: Vec<NodeId>,
    /// The node's own distribution, kept only when some child is unobserved.
    pub fallback: ClassDistribution,
}

/// A tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl TreeNode {
    /// Leaf for a node no instance reached.
    pub fn unobserved() -> Self {
        TreeNode::Leaf(LeafNode {
            distribution: ClassDistribution::Unobserved,
            stats: None,
        })
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// Returns true for a leaf no training instance reached.
    #[inline]
    pub fn is_unobserved_leaf(&self) -> bool {
        matches!(
            self,
            TreeNode::Leaf(LeafNode {
                distribution: ClassDistribution::Unobserved,
                ..
            })
        )
    }

    /// Children ids (empty for leaves).
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match self {
            TreeNode::Leaf(_) => &[],
            TreeNode::Internal(node) => &node.children,
        }
    }
}
