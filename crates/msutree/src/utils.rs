//! Common utilities used across the crate.
//!
//! Contingency-table entropies (in bits), weighted variance helpers and the
//! floating-point tolerances shared by split search and stopping tests.

// =============================================================================
// Tolerances
// =============================================================================

/// Absolute tolerance for score and weight comparisons.
pub const SMALL: f64 = 1e-6;

/// `a` is greater than `b` by more than [`SMALL`].
#[inline]
pub fn gr(a: f64, b: f64) -> bool {
    a - b > SMALL
}

/// `a` and `b` differ by less than [`SMALL`].
#[inline]
pub fn eq(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() < SMALL
}

// =============================================================================
// Vector helpers
// =============================================================================

/// Index of the first maximum element (0 for an empty slice).
pub fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Scale `values` in place so they sum to one. No-op if the sum is not positive.
pub fn normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}

// =============================================================================
// Entropy
// =============================================================================

#[inline]
fn x_ln_x(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        x * x.ln()
    }
}

/// Entropy (bits) of a vector of non-negative counts or weights.
pub fn entropy(counts: &[f64]) -> f64 {
    let mut acc = 0.0;
    let mut total = 0.0;
    for &c in counts {
        acc -= x_ln_x(c);
        total += c;
    }
    if eq(total, 0.0) {
        return 0.0;
    }
    (acc + x_ln_x(total)) / (total * std::f64::consts::LN_2)
}

/// Conditional entropy (bits) of the columns given the rows.
///
/// Rows are split branches, columns are classes.
pub fn entropy_conditioned_on_rows(matrix: &[Vec<f64>]) -> f64 {
    let mut acc = 0.0;
    let mut total = 0.0;
    for row in matrix {
        let mut row_sum = 0.0;
        for &c in row {
            acc += x_ln_x(c);
            row_sum += c;
        }
        acc -= x_ln_x(row_sum);
        total += row_sum;
    }
    if eq(total, 0.0) {
        return 0.0;
    }
    -acc / (total * std::f64::consts::LN_2)
}

/// Entropy (bits) of the column marginals.
pub fn entropy_over_columns(matrix: &[Vec<f64>]) -> f64 {
    let n_cols = matrix.first().map_or(0, Vec::len);
    let mut column_sums = vec![0.0; n_cols];
    for row in matrix {
        for (sum, &c) in column_sums.iter_mut().zip(row) {
            *sum += c;
        }
    }
    entropy(&column_sums)
}

// =============================================================================
// Variance
// =============================================================================

/// Weighted sum of squared deviations: `ss - s² / w`.
#[inline]
pub fn single_variance(sum: f64, sum_squared: f64, weight: f64) -> f64 {
    sum_squared - (sum * sum) / weight
}

/// Summed [`single_variance`] over branches with positive weight.
pub fn variance(sums: &[f64], sums_squared: &[f64], weights: &[f64]) -> f64 {
    sums.iter()
        .zip(sums_squared)
        .zip(weights)
        .filter(|(_, &w)| w > 0.0)
        .map(|((&s, &ss), &w)| single_variance(s, ss, w))
        .sum()
}
