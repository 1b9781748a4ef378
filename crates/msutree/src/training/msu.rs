//! Multivariate symmetrical uncertainty.
//!
//! For a set of discrete variables `X1..Xm` plus the label `Y` (`n = m + 1`
//! variables in total):
//!
//! ```text
//! MSU = n / (n - 1) * (1 - H(X1, ..., Xm, Y) / (H(X1) + ... + H(Xm) + H(Y)))
//! ```
//!
//! It is 0 when the variables are independent and 1 when they fully
//! determine each other. With a single attribute it reduces to the classic
//! symmetrical uncertainty `2 * I(X; Y) / (H(X) + H(Y))`.
//!
//! Entropies use plain instance counts; weights do not enter the score.

use std::collections::BTreeMap;

use ndarray::ArrayView2;

use crate::utils::entropy;

/// Scores a joint attribute subset against the label.
///
/// Implementations must be deterministic: identical inputs give identical
/// scores. Scores are non-negative and comparable between candidates of the
/// same node.
pub trait UncertaintyOracle {
    /// Score the columns `subset` of `data` against `labels`.
    ///
    /// # Arguments
    ///
    /// * `data` - Categorical matrix, `[n_instances, n_columns]`
    /// * `cardinalities` - Number of codes per column of `data`
    /// * `subset` - Column indices forming the joint variable
    /// * `labels` - Label code per instance
    /// * `n_labels` - Label cardinality
    fn score(
        &self,
        data: ArrayView2<'_, u32>,
        cardinalities: &[u32],
        subset: &[usize],
        labels: &[u32],
        n_labels: u32,
    ) -> f64;
}

/// The MSU score.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultivariateSymmetricalUncertainty;

impl UncertaintyOracle for MultivariateSymmetricalUncertainty {
    fn score(
        &self,
        data: ArrayView2<'_, u32>,
        cardinalities: &[u32],
        subset: &[usize],
        labels: &[u32],
        n_labels: u32,
    ) -> f64 {
        if subset.is_empty() || labels.is_empty() {
            return 0.0;
        }
        debug_assert_eq!(data.nrows(), labels.len());

        let mut marginal_sum = marginal_entropy(labels.iter().copied());
        for &column in subset {
            marginal_sum += marginal_entropy(data.column(column).iter().copied());
        }
        if marginal_sum <= 0.0 {
            return 0.0;
        }

        let joint = joint_entropy(data, cardinalities, subset, labels, n_labels);
        let n = (subset.len() + 1) as f64;
        let msu = n / (n - 1.0) * (1.0 - joint / marginal_sum);
        msu.max(0.0)
    }
}

/// Entropy of one variable from its codes.
fn marginal_entropy(codes: impl Iterator<Item = u32>) -> f64 {
    let mut counts: Vec<f64> = Vec::new();
    for code in codes {
        let code = code as usize;
        if code >= counts.len() {
            counts.resize(code + 1, 0.0);
        }
        counts[code] += 1.0;
    }
    entropy(&counts)
}

/// Largest joint table counted densely, in cells.
const DENSE_TABLE_LIMIT: u64 = 1 << 16;

/// Entropy of the joint variable `(subset columns..., label)`.
///
/// Rows are keyed by a mixed-radix `u64` when the product of cardinalities
/// fits, by the full code tuple otherwise. Small key spaces are counted in a
/// dense table, larger ones in ordered maps, so counts always reach
/// [`entropy`] in key order.
fn joint_entropy(
    data: ArrayView2<'_, u32>,
    cardinalities: &[u32],
    subset: &[usize],
    labels: &[u32],
    n_labels: u32,
) -> f64 {
    let radices = subset
        .iter()
        .map(|&c| u64::from(cardinalities[c].max(1)))
        .chain(std::iter::once(u64::from(n_labels.max(1))))
        .try_fold((Vec::with_capacity(subset.len() + 1), 1u64), |(mut acc, stride), radix| {
            acc.push(stride);
            stride.checked_mul(radix).map(|next| (acc, next))
        });

    let key_of = |row: usize, strides: &[u64]| -> u64 {
        let mut key = u64::from(labels[row]) * strides[subset.len()];
        for (&column, &stride) in subset.iter().zip(strides) {
            key += u64::from(data[[row, column]]) * stride;
        }
        key
    };

    let counts: Vec<f64> = match radices {
        Some((strides, n_cells)) if n_cells <= DENSE_TABLE_LIMIT => {
            let mut table = vec![0.0; n_cells as usize];
            for row in 0..labels.len() {
                table[key_of(row, &strides) as usize] += 1.0;
            }
            table
        }
        Some((strides, _)) => {
            let mut table: BTreeMap<u64, f64> = BTreeMap::new();
            for row in 0..labels.len() {
                *table.entry(key_of(row, &strides)).or_insert(0.0) += 1.0;
            }
            table.into_values().collect()
        }
        None => {
            let mut table: BTreeMap<Vec<u32>, f64> = BTreeMap::new();
            for (row, &label) in labels.iter().enumerate() {
                let mut key: Vec<u32> = subset.iter().map(|&c| data[[row, c]]).collect();
                key.push(label);
                *table.entry(key).or_insert(0.0) += 1.0;
            }
            table.into_values().collect()
        }
    };

    entropy(&counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use rstest::rstest;

    fn msu(data: &Array2<u32>, cards: &[u32], subset: &[usize], labels: &[u32]) -> f64 {
        MultivariateSymmetricalUncertainty.score(data.view(), cards, subset, labels, 2)
    }

    #[test]
    fn copy_of_label_scores_one() {
        let data = array![[0], [0], [1], [1]];
        assert_abs_diff_eq!(msu(&data, &[2], &[0], &[0, 0, 1, 1]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn independent_column_scores_zero() {
        let data = array![[0], [1], [0], [1]];
        assert_abs_diff_eq!(msu(&data, &[2], &[0], &[0, 0, 1, 1]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_column_and_label_scores_zero() {
        let data = array![[0], [0], [0]];
        assert_eq!(msu(&data, &[1], &[0], &[1, 1, 1]), 0.0);
    }

    #[test]
    fn single_column_matches_symmetrical_uncertainty() {
        let data = array![[0], [0], [1], [1], [1], [0]];
        let labels = [0, 0, 1, 1, 0, 1];
        let h_x = entropy(&[3.0, 3.0]);
        let h_y = entropy(&[3.0, 3.0]);
        let h_xy = entropy(&[2.0, 1.0, 2.0, 1.0]);
        let expected = 2.0 * (h_x + h_y - h_xy) / (h_x + h_y);
        assert_abs_diff_eq!(msu(&data, &[2], &[0], &labels), expected, epsilon = 1e-12);
    }

    #[test]
    fn xor_interaction_is_captured_jointly() {
        // y = a XOR b: each column alone is independent of y.
        let data = array![[0, 0], [0, 1], [1, 0], [1, 1], [0, 0], [0, 1], [1, 0], [1, 1]];
        let labels = [0, 1, 1, 0, 0, 1, 1, 0];
        let cards = [2, 2];
        assert_abs_diff_eq!(msu(&data, &cards, &[0], &labels), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(msu(&data, &cards, &[1], &labels), 0.0, epsilon = 1e-12);
        assert!(msu(&data, &cards, &[0, 1], &labels) > 0.3);
    }

    #[test]
    fn large_cardinalities_fall_back_to_tuple_keys() {
        let data = array![[0, 0, 0], [1, 1, 1], [0, 1, 0], [1, 0, 1]];
        let labels = [0, 1, 0, 1];
        let small = MultivariateSymmetricalUncertainty.score(
            data.view(),
            &[2, 2, 2],
            &[0, 1, 2],
            &labels,
            2,
        );
        let huge = MultivariateSymmetricalUncertainty.score(
            data.view(),
            &[u32::MAX, u32::MAX, u32::MAX],
            &[0, 1, 2],
            &labels,
            2,
        );
        assert_abs_diff_eq!(small, huge, epsilon = 1e-12);
    }

    /// Pseudo-random codes from a linear congruential sequence.
    fn scrambled(rows: usize, cards: &[u32], n_labels: u32) -> (Array2<u32>, Vec<u32>) {
        let mut state = 0x2545_f491_u64;
        let mut next = |modulus: u32| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            ((state >> 33) % u64::from(modulus)) as u32
        };
        let data = Array2::from_shape_fn((rows, cards.len()), |(_, j)| next(cards[j]));
        let labels = (0..rows).map(|_| next(n_labels)).collect();
        (data, labels)
    }

    #[test]
    fn repeated_scores_are_bitwise_identical() {
        let cards = [7, 7, 5];
        let (mut data, labels) = scrambled(2000, &cards, 4);
        let copy = data.column(0).to_owned();
        data.column_mut(1).assign(&copy);

        let oracle = MultivariateSymmetricalUncertainty;
        let first = oracle.score(data.view(), &cards, &[2, 0], &labels, 4);
        for _ in 0..100 {
            let again = oracle.score(data.view(), &cards, &[2, 0], &labels, 4);
            assert_eq!(again.to_bits(), first.to_bits());
            let twin = oracle.score(data.view(), &cards, &[2, 1], &labels, 4);
            assert_eq!(twin.to_bits(), first.to_bits());
        }
    }

    #[rstest]
    #[case(&[7, 7, 5])]
    #[case(&[300, 300, 300])]
    #[case(&[u32::MAX, u32::MAX, u32::MAX])]
    fn table_layouts_agree(#[case] cards: &[u32]) {
        // The same codes under a dense table, an ordered key map and tuple keys.
        let (data, labels) = scrambled(500, &[7, 7, 5], 3);
        let reference = MultivariateSymmetricalUncertainty.score(
            data.view(),
            &[7, 7, 5],
            &[0, 1, 2],
            &labels,
            3,
        );
        let score =
            MultivariateSymmetricalUncertainty.score(data.view(), cards, &[0, 1, 2], &labels, 3);
        assert_abs_diff_eq!(score, reference, epsilon = 1e-12);
    }

    #[test]
    fn empty_inputs_score_zero() {
        let data = Array2::<u32>::zeros((0, 1));
        assert_eq!(msu(&data, &[2], &[0], &[]), 0.0);
        let data = array![[0], [1]];
        assert_eq!(msu(&data, &[2], &[], &[0, 1]), 0.0);
    }
}
