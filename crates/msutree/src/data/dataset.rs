//! Dataset container and builder.
//!
//! This module provides [`Dataset`] and [`DatasetBuilder`].

use ndarray::{Array1, Array2, ArrayView1};

use super::schema::{AttributeMeta, DatasetSchema};

/// Dataset construction/validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("inconsistent number of instances: attribute '{attribute}' expected {expected}, got {got}")]
    InconsistentRows {
        attribute: String,
        expected: usize,
        got: usize,
    },

    #[error("dataset has no target attribute")]
    MissingTarget,

    #[error("number of targets ({targets}) does not match number of instances ({rows})")]
    TargetLenMismatch { rows: usize, targets: usize },

    #[error("number of weights ({weights}) does not match number of instances ({rows})")]
    WeightLenMismatch { rows: usize, weights: usize },

    #[error("instance {row} has invalid weight {value} (weights must be finite and non-negative)")]
    InvalidWeight { row: usize, value: f64 },

    #[error("attribute '{attribute}' has invalid category code {value} at instance {row}")]
    InvalidCategory {
        attribute: String,
        row: usize,
        value: f64,
    },

    #[error("duplicate attribute name '{0}'")]
    DuplicateAttribute(String),
}

/// A set of weighted training instances.
///
/// # Storage Layout
///
/// Attribute values are stored in **attribute-major** layout:
/// `[n_attributes, n_instances]`, so each attribute's values across all
/// instances are contiguous. Nominal values are category codes stored as
/// `f64`. Missing values are `f64::NAN`, for predictors and target alike.
///
/// The dataset is immutable once built; nodes refer to it through
/// [`InstanceSubset`](super::InstanceSubset) views.
///
/// # Example
///
/// ```
/// use msutree::data::Dataset;
/// use ndarray::array;
///
/// let ds = Dataset::builder()
///     .add_numeric("age", array![25.0, 30.0, 35.0].view())
///     .add_nominal("color", ["red", "blue"], array![0.0, 1.0, 0.0].view())
///     .nominal_target("label", ["no", "yes"], array![0.0, 1.0, 1.0].view())
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.n_instances(), 3);
/// assert_eq!(ds.n_attributes(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Attribute values: `[n_attributes, n_instances]`.
    values: Array2<f64>,

    /// Predictor and target metadata.
    schema: DatasetSchema,

    /// Target values (class codes or numeric targets): length = n_instances.
    targets: Array1<f64>,

    /// Instance weights: length = n_instances.
    weights: Array1<f64>,
}

impl Dataset {
    /// Create a builder.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of instances.
    #[inline]
    pub fn n_instances(&self) -> usize {
        self.targets.len()
    }

    /// Number of predictor attributes.
    #[inline]
    pub fn n_attributes(&self) -> usize {
        self.schema.n_attributes()
    }

    /// Number of target classes (0 for a numeric target).
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.schema.n_classes()
    }

    /// Get the schema.
    #[inline]
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Returns true if the target is nominal.
    #[inline]
    pub fn has_nominal_target(&self) -> bool {
        self.schema.target().is_nominal()
    }

    /// Value of `attribute` for instance `row`.
    #[inline]
    pub fn value(&self, attribute: usize, row: usize) -> f64 {
        self.values[[attribute, row]]
    }

    /// Returns true if `attribute` is missing for instance `row`.
    #[inline]
    pub fn is_missing(&self, attribute: usize, row: usize) -> bool {
        self.values[[attribute, row]].is_nan()
    }

    /// All values of one attribute.
    #[inline]
    pub fn attribute_values(&self, attribute: usize) -> ArrayView1<'_, f64> {
        self.values.row(attribute)
    }

    /// Target value of instance `row`.
    #[inline]
    pub fn target(&self, row: usize) -> f64 {
        self.targets[row]
    }

    /// Class code of instance `row`. Only meaningful for nominal targets.
    #[inline]
    pub fn class_code(&self, row: usize) -> usize {
        self.targets[row] as usize
    }

    /// All target values.
    #[inline]
    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.targets.view()
    }

    /// Weight of instance `row`.
    #[inline]
    pub fn weight(&self, row: usize) -> f64 {
        self.weights[row]
    }

    /// All instance weights.
    #[inline]
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Returns true if any predictor value is missing.
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// Returns true if any target value is missing.
    pub fn has_missing_targets(&self) -> bool {
        self.targets.iter().any(|v| v.is_nan())
    }
}

// =============================================================================
// DatasetBuilder
// =============================================================================

/// Builder for [`Dataset`] with mixed attribute kinds.
///
/// Columns are validated at [`build`](DatasetBuilder::build): equal lengths,
/// category codes in range, finite non-negative weights. Weights default to 1.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<Array1<f64>>,
    metas: Vec<AttributeMeta>,
    target: Option<(AttributeMeta, Array1<f64>)>,
    weights: Option<Array1<f64>>,
}

impl DatasetBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predictor column with explicit metadata.
    pub fn add_attribute(mut self, meta: AttributeMeta, values: ArrayView1<f64>) -> Self {
        self.columns.push(values.to_owned());
        self.metas.push(meta);
        self
    }

    /// Add a numeric predictor column.
    pub fn add_numeric(self, name: &str, values: ArrayView1<f64>) -> Self {
        self.add_attribute(AttributeMeta::numeric(name), values)
    }

    /// Add a date predictor column (numeric timestamps).
    pub fn add_date(self, name: &str, values: ArrayView1<f64>) -> Self {
        self.add_attribute(AttributeMeta::date(name), values)
    }

    /// Add a nominal predictor column.
    ///
    /// Values are category codes encoded as floats (0.0, 1.0, ...).
    pub fn add_nominal<I, S>(self, name: &str, categories: I, values: ArrayView1<f64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_attribute(AttributeMeta::nominal(name, categories), values)
    }

    /// Set the target with explicit metadata.
    pub fn target(mut self, meta: AttributeMeta, values: ArrayView1<f64>) -> Self {
        self.target = Some((meta, values.to_owned()));
        self
    }

    /// Set a nominal target (class codes encoded as floats).
    pub fn nominal_target<I, S>(self, name: &str, classes: I, values: ArrayView1<f64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target(AttributeMeta::nominal(name, classes), values)
    }

    /// Set a numeric target.
    pub fn numeric_target(self, name: &str, values: ArrayView1<f64>) -> Self {
        self.target(AttributeMeta::numeric(name), values)
    }

    /// Set per-instance weights.
    pub fn weights(mut self, weights: ArrayView1<f64>) -> Self {
        self.weights = Some(weights.to_owned());
        self
    }

    /// Validate and build the dataset.
    pub fn build(self) -> Result<Dataset, DatasetError> {
        let (target_meta, targets) = self.target.ok_or(DatasetError::MissingTarget)?;
        let n_rows = targets.len();

        for (i, meta) in self.metas.iter().enumerate() {
            if self.metas[..i].iter().any(|m| m.name == meta.name) {
                return Err(DatasetError::DuplicateAttribute(meta.name.clone()));
            }
        }

        for (meta, column) in self.metas.iter().zip(&self.columns) {
            if column.len() != n_rows {
                return Err(DatasetError::InconsistentRows {
                    attribute: meta.name.clone(),
                    expected: n_rows,
                    got: column.len(),
                });
            }
            if meta.is_nominal() {
                check_codes(meta, column.view())?;
            }
        }
        if target_meta.is_nominal() {
            check_codes(&target_meta, targets.view())?;
        }

        let weights = match self.weights {
            Some(w) => {
                if w.len() != n_rows {
                    return Err(DatasetError::WeightLenMismatch {
                        rows: n_rows,
                        weights: w.len(),
                    });
                }
                if let Some((row, &value)) =
                    w.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0)
                {
                    return Err(DatasetError::InvalidWeight { row, value });
                }
                w
            }
            None => Array1::ones(n_rows),
        };

        let mut values = Array2::zeros((self.columns.len(), n_rows));
        for (i, column) in self.columns.iter().enumerate() {
            values.row_mut(i).assign(column);
        }

        Ok(Dataset {
            values,
            schema: DatasetSchema::new(self.metas, target_meta),
            targets,
            weights,
        })
    }
}

/// Category codes must be integral and within `0..n_categories` (NaN = missing).
fn check_codes(meta: &AttributeMeta, values: ArrayView1<f64>) -> Result<(), DatasetError> {
    let n_categories = meta.kind.n_categories() as f64;
    for (row, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if value < 0.0 || value >= n_categories || value.fract() != 0.0 {
            return Err(DatasetError::InvalidCategory {
                attribute: meta.name.clone(),
                row,
                value,
            });
        }
    }
    Ok(())
}
