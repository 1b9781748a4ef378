//! Canonical tree representation.
//!
//! Trees produced by [`crate::training::MsuTreeTrainer`] are plain data:
//! an arena of [`TreeNode`]s with the schema needed to interpret splits.

/// Node identifier: index into the tree's node arena.
pub type NodeId = u32;

pub mod node;
pub mod tree;

pub use node::{ClassDistribution, InternalNode, LeafNode, Split, TargetStats, TreeNode};
pub use tree::{MsuTree, TreeValidationError};
