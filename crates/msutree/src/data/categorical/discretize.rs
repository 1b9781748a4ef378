//! Supervised MDL discretization (Fayyad & Irani).
//!
//! Numeric columns are cut recursively: at each step the boundary between two
//! distinct consecutive values that minimises the class entropy of the two
//! halves is proposed, and accepted only if its information gain beats the
//! minimum-description-length bound
//!
//! ```text
//! gain > (log2(N - 1) + log2(3^k - 2) - [k·H(S) - k1·H(S1) - k2·H(S2)]) / N
//! ```
//!
//! where `k`, `k1`, `k2` count the classes present in the set and the two
//! halves. Accepted halves are cut again independently.
//!
//! Values are counted with unit weight. Missing values (NaN) take no part in
//! choosing cut points.

use crate::utils::{entropy, entropy_conditioned_on_rows};

/// Fayyad–Irani supervised discretizer.
#[derive(Clone, Debug, Default)]
pub struct MdlDiscretizer {
    /// Count only the distinct boundaries as candidate cut points in the MDL
    /// bound instead of `N - 1`. Default: `false`.
    pub use_better_encoding: bool,
}

impl MdlDiscretizer {
    /// Create a discretizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute ascending cut points for one numeric column.
    ///
    /// # Arguments
    /// * `values` - Column values, one per instance (NaN = missing)
    /// * `labels` - Class code per instance
    /// * `n_labels` - Number of classes
    pub fn cut_points(&self, values: &[f64], labels: &[u32], n_labels: usize) -> Vec<f64> {
        debug_assert_eq!(values.len(), labels.len());

        let mut sorted: Vec<(f64, u32)> = values
            .iter()
            .zip(labels)
            .filter(|(v, _)| !v.is_nan())
            .map(|(&v, &l)| (v, l))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut cuts = Vec::new();
        self.cut_subset(&sorted, n_labels, &mut cuts);
        cuts
    }

    /// Bin index of `value`: the first cut point `>= value`, or `cuts.len()`.
    #[inline]
    pub fn bin_of(cut_points: &[f64], value: f64) -> u32 {
        cut_points.partition_point(|&c| c < value) as u32
    }

    fn cut_subset(&self, sorted: &[(f64, u32)], n_labels: usize, cuts: &mut Vec<f64>) {
        if sorted.len() < 2 {
            return;
        }

        let mut counts = vec![vec![0.0; n_labels], vec![0.0; n_labels]];
        for &(_, label) in sorted {
            counts[1][label as usize] += 1.0;
        }
        let prior_counts = counts[1].clone();
        let prior_entropy = entropy(&prior_counts);

        let mut best_entropy = prior_entropy;
        let mut best: Option<(usize, f64)> = None;
        let mut best_counts = counts.clone();
        let mut n_boundaries = 0usize;

        for i in 0..sorted.len() - 1 {
            let label = sorted[i].1 as usize;
            counts[0][label] += 1.0;
            counts[1][label] -= 1.0;

            if sorted[i].0 < sorted[i + 1].0 {
                let cut = (sorted[i].0 + sorted[i + 1].0) / 2.0;
                let current = entropy_conditioned_on_rows(&counts);
                if current < best_entropy {
                    best_entropy = current;
                    best = Some((i, cut));
                    best_counts.clone_from(&counts);
                }
                n_boundaries += 1;
            }
        }

        let Some((best_index, best_cut)) = best else {
            return;
        };
        if prior_entropy - best_entropy <= 0.0 {
            return;
        }

        let n_cut_points = if self.use_better_encoding {
            n_boundaries
        } else {
            sorted.len() - 1
        };

        if accept_split(&prior_counts, &best_counts, sorted.len() as f64, n_cut_points) {
            self.cut_subset(&sorted[..=best_index], n_labels, cuts);
            cuts.push(best_cut);
            self.cut_subset(&sorted[best_index + 1..], n_labels, cuts);
        }
    }
}

/// Fayyad & Irani's MDL acceptance test.
fn accept_split(
    prior_counts: &[f64],
    best_counts: &[Vec<f64>],
    n_instances: f64,
    n_cut_points: usize,
) -> bool {
    let present = |c: &[f64]| c.iter().filter(|&&x| x > 0.0).count() as f64;

    let prior_entropy = entropy(prior_counts);
    let gain = prior_entropy - entropy_conditioned_on_rows(best_counts);

    let k = present(prior_counts);
    let k_left = present(&best_counts[0]);
    let k_right = present(&best_counts[1]);
    let entropy_left = entropy(&best_counts[0]);
    let entropy_right = entropy(&best_counts[1]);

    let delta = (3f64.powf(k) - 2.0).log2()
        - (k * prior_entropy - k_right * entropy_right - k_left * entropy_left);

    gain > ((n_cut_points as f64).log2() + delta) / n_instances
}
