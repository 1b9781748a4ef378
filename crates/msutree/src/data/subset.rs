//! Weighted instance subsets.
//!
//! A node never copies attribute values. It works on an [`InstanceSubset`]:
//! row indices into the [`Dataset`] paired with the effective weight of each
//! row at that node. Effective weights differ from the dataset weights only
//! when an instance with a missing split value was routed fractionally into
//! several branches.

use super::Dataset;

/// The instances reaching a node, as `(row, effective weight)` pairs.
///
/// The same row may appear in several sibling subsets (fractional routing),
/// never twice in one subset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceSubset {
    rows: Vec<u32>,
    weights: Vec<f64>,
}

impl InstanceSubset {
    /// Create an empty subset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty subset with room for `capacity` instances.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
        }
    }

    /// All instances of `dataset` with their dataset weights.
    pub fn all(dataset: &Dataset) -> Self {
        let n = dataset.n_instances();
        Self {
            rows: (0..n as u32).collect(),
            weights: dataset.weights().to_vec(),
        }
    }

    /// Build a subset from explicit rows and weights.
    ///
    /// # Panics
    ///
    /// Panics if `rows` and `weights` differ in length.
    pub fn from_parts(rows: Vec<u32>, weights: Vec<f64>) -> Self {
        assert_eq!(rows.len(), weights.len(), "rows and weights must align");
        Self { rows, weights }
    }

    /// Append an instance.
    #[inline]
    pub fn push(&mut self, row: u32, weight: f64) {
        self.rows.push(row);
        self.weights.push(weight);
    }

    /// Number of instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no instance reaches the node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices, in node order.
    #[inline]
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Effective weights, aligned with [`rows`](Self::rows).
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over `(row, effective weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.weights)
            .map(|(&r, &w)| (r as usize, w))
    }

    /// Sum of effective weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}
