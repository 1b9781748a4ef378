use ndarray::Array1;
use rand::prelude::*;

use crate::data::Dataset;

/// Eight instances: nominal `c` equals the class, numeric `x` is noise.
///
/// Sorted by `x` the classes alternate, so `x` has no accepted MDL cut.
pub fn correlated_nominal() -> Dataset {
    let c = Array1::from(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    let x = Array1::from(vec![1.0, 3.0, 5.0, 7.0, 2.0, 4.0, 6.0, 8.0]);
    Dataset::builder()
        .add_nominal("c", ["a", "b"], c.view())
        .add_numeric("x", x.view())
        .nominal_target("y", ["no", "yes"], c.view())
        .build()
        .expect("valid dataset")
}

/// `y = a XOR b` over eight instances, unbalanced so `a` alone is weakly
/// informative.
pub fn xor_dataset() -> Dataset {
    let rows: [(f64, f64); 8] = [
        (0.0, 0.0),
        (0.0, 0.0),
        (0.0, 0.0),
        (0.0, 1.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (1.0, 1.0),
    ];
    let a: Array1<f64> = rows.iter().map(|r| r.0).collect();
    let b: Array1<f64> = rows.iter().map(|r| r.1).collect();
    let y: Array1<f64> = rows
        .iter()
        .map(|&(a, b)| if a != b { 1.0 } else { 0.0 })
        .collect();
    Dataset::builder()
        .add_nominal("a", ["0", "1"], a.view())
        .add_nominal("b", ["0", "1"], b.view())
        .nominal_target("y", ["0", "1"], y.view())
        .build()
        .expect("valid dataset")
}

/// Random mixed-attribute classification data.
///
/// Attributes `n0..` are nominal with three categories, `x0..` are uniform in
/// `[0, 10)`. The class depends on `n0` and `x0` (when present), with
/// `noise` the probability of a uniformly random class. Each predictor value
/// is missing with probability `missing`.
pub fn random_classification(
    rows: usize,
    n_nominal: usize,
    n_numeric: usize,
    n_classes: usize,
    seed: u64,
    noise: f64,
    missing: f64,
) -> Dataset {
    assert!(n_classes >= 2);
    let mut rng = StdRng::seed_from_u64(seed);

    let nominal: Vec<Vec<f64>> = (0..n_nominal)
        .map(|_| (0..rows).map(|_| rng.gen_range(0..3) as f64).collect())
        .collect();
    let numeric: Vec<Vec<f64>> = (0..n_numeric)
        .map(|_| (0..rows).map(|_| rng.gen::<f64>() * 10.0).collect())
        .collect();

    let labels: Vec<f64> = (0..rows)
        .map(|r| {
            if rng.gen::<f64>() < noise {
                return rng.gen_range(0..n_classes) as f64;
            }
            let mut score = 0usize;
            if let Some(col) = nominal.first() {
                score += col[r] as usize;
            }
            if let Some(col) = numeric.first() {
                score += usize::from(col[r] > 5.0);
            }
            (score % n_classes) as f64
        })
        .collect();

    let mut builder = Dataset::builder();
    for (i, col) in nominal.into_iter().enumerate() {
        let col = with_missing(col, missing, &mut rng);
        builder = builder.add_nominal(&format!("n{i}"), ["p", "q", "r"], col.view());
    }
    for (i, col) in numeric.into_iter().enumerate() {
        let col = with_missing(col, missing, &mut rng);
        builder = builder.add_numeric(&format!("x{i}"), col.view());
    }
    let classes: Vec<String> = (0..n_classes).map(|c| format!("c{c}")).collect();
    builder
        .nominal_target("class", classes, Array1::from(labels).view())
        .build()
        .expect("valid dataset")
}

/// Random numeric-target data: `y = 2 * x0 - x1 + noise` over uniform numeric
/// predictors.
pub fn random_regression(rows: usize, cols: usize, seed: u64, noise: f64) -> Dataset {
    assert!(cols >= 2);
    let mut rng = StdRng::seed_from_u64(seed);
    let columns: Vec<Vec<f64>> = (0..cols)
        .map(|_| (0..rows).map(|_| rng.gen::<f64>() * 10.0).collect())
        .collect();
    let targets: Array1<f64> = (0..rows)
        .map(|r| 2.0 * columns[0][r] - columns[1][r] + (rng.gen::<f64>() * 2.0 - 1.0) * noise)
        .collect();

    let mut builder = Dataset::builder();
    for (i, col) in columns.into_iter().enumerate() {
        builder = builder.add_numeric(&format!("x{i}"), Array1::from(col).view());
    }
    builder
        .numeric_target("y", targets.view())
        .build()
        .expect("valid dataset")
}

fn with_missing(col: Vec<f64>, missing: f64, rng: &mut StdRng) -> Array1<f64> {
    col.into_iter()
        .map(|v| if rng.gen::<f64>() < missing { f64::NAN } else { v })
        .collect()
}
