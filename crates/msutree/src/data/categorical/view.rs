//! Categorical view adapter.

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::MdlDiscretizer;
use crate::data::{AttributeKind, Dataset, InstanceSubset};

/// Errors raised while building or querying a [`CategoricalView`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("categorical view requires a nominal class attribute, '{name}' is {kind}")]
    NonNominalTarget { name: String, kind: AttributeKind },

    #[error("attribute '{name}' is {kind}, only nominal and numeric attributes can be made categorical")]
    UnsupportedAttribute { name: String, kind: AttributeKind },

    #[error("attribute '{0}' has no column in the categorical view")]
    UnknownColumn(String),
}

/// Which mix of attribute kinds produced a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewShape {
    /// Every predictor is nominal (also used when there are no predictors).
    Categorical,
    /// Every predictor is numeric and was discretized.
    Numerical,
    /// Nominal columns first, followed by the discretized numeric columns.
    Mixed,
}

/// Where a categorical column came from.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnOrigin {
    /// Nominal attribute, codes passed through.
    Nominal { categories: Vec<String> },
    /// Numeric attribute, binned at these ascending cut points.
    Discretized { cut_points: Vec<f64> },
}

/// One column of a [`CategoricalView`].
#[derive(Clone, Debug, PartialEq)]
pub struct CategoricalColumn {
    /// Source attribute name.
    pub name: String,
    /// Source attribute id in the dataset.
    pub attribute: usize,
    pub origin: ColumnOrigin,
}

/// A node's instances as an integer matrix plus labels.
///
/// # Layout
///
/// `data()` is instance-major: `[n_instances, n_columns]`, rows in
/// [`InstanceSubset`] order. Column `j` takes values in
/// `0..cardinalities()[j]`. A missing value gets the extra code
/// `n_categories` (nominal) or `n_bins` (numeric), in which case the column's
/// cardinality includes that extra code.
#[derive(Clone, Debug)]
pub struct CategoricalView {
    data: Array2<u32>,
    cardinalities: Vec<u32>,
    columns: Vec<CategoricalColumn>,
    labels: Vec<u32>,
    label_names: Vec<String>,
    shape: ViewShape,
}

impl CategoricalView {
    /// Build the view of `subset` with a default [`MdlDiscretizer`].
    pub fn from_subset(dataset: &Dataset, subset: &InstanceSubset) -> Result<Self, AdapterError> {
        Self::with_discretizer(dataset, subset, &MdlDiscretizer::default())
    }

    /// Build the view of `subset`, discretizing numeric attributes with `discretizer`.
    ///
    /// Fails if the target is not nominal or a predictor is neither nominal
    /// nor numeric. Instance weights are ignored: every row counts once.
    pub fn with_discretizer(
        dataset: &Dataset,
        subset: &InstanceSubset,
        discretizer: &MdlDiscretizer,
    ) -> Result<Self, AdapterError> {
        let schema = dataset.schema();
        let target = schema.target();
        if !target.is_nominal() {
            return Err(AdapterError::NonNominalTarget {
                name: target.name.clone(),
                kind: target.kind.clone(),
            });
        }

        let mut nominal = Vec::new();
        let mut numeric = Vec::new();
        for (id, meta) in schema.attributes().iter().enumerate() {
            match meta.kind {
                AttributeKind::Nominal { .. } => nominal.push(id),
                AttributeKind::Numeric | AttributeKind::Date => numeric.push(id),
                AttributeKind::String => {
                    return Err(AdapterError::UnsupportedAttribute {
                        name: meta.name.clone(),
                        kind: meta.kind.clone(),
                    })
                }
            }
        }

        let shape = match (nominal.is_empty(), numeric.is_empty()) {
            (_, true) => ViewShape::Categorical,
            (true, false) => ViewShape::Numerical,
            (false, false) => ViewShape::Mixed,
        };

        let rows = subset.rows();
        let labels: Vec<u32> = rows.iter().map(|&r| dataset.target(r as usize) as u32).collect();
        let n_labels = schema.n_classes();

        let n_columns = nominal.len() + numeric.len();
        let mut data = Array2::zeros((rows.len(), n_columns));
        let mut cardinalities = Vec::with_capacity(n_columns);
        let mut columns = Vec::with_capacity(n_columns);

        for (j, &id) in nominal.iter().enumerate() {
            let meta = schema.attribute(id);
            let n_categories = meta.kind.n_categories() as u32;
            let mut has_missing = false;
            for (i, &r) in rows.iter().enumerate() {
                let value = dataset.value(id, r as usize);
                data[[i, j]] = if value.is_nan() {
                    has_missing = true;
                    n_categories
                } else {
                    value as u32
                };
            }
            cardinalities.push(n_categories + u32::from(has_missing));
            columns.push(CategoricalColumn {
                name: meta.name.clone(),
                attribute: id,
                origin: ColumnOrigin::Nominal {
                    categories: meta.kind.categories().to_vec(),
                },
            });
        }

        for (offset, &id) in numeric.iter().enumerate() {
            let j = nominal.len() + offset;
            let meta = schema.attribute(id);
            let values: Vec<f64> = rows.iter().map(|&r| dataset.value(id, r as usize)).collect();
            let cut_points = discretizer.cut_points(&values, &labels, n_labels);
            let n_bins = cut_points.len() as u32 + 1;

            let mut has_missing = false;
            for (i, &value) in values.iter().enumerate() {
                data[[i, j]] = if value.is_nan() {
                    has_missing = true;
                    n_bins
                } else {
                    MdlDiscretizer::bin_of(&cut_points, value)
                };
            }
            cardinalities.push(n_bins + u32::from(has_missing));
            columns.push(CategoricalColumn {
                name: meta.name.clone(),
                attribute: id,
                origin: ColumnOrigin::Discretized { cut_points },
            });
        }

        Ok(Self {
            data,
            cardinalities,
            columns,
            labels,
            label_names: target.kind.categories().to_vec(),
            shape,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Categorical matrix, `[n_instances, n_columns]`.
    #[inline]
    pub fn data(&self) -> ArrayView2<'_, u32> {
        self.data.view()
    }

    /// One column of the matrix.
    #[inline]
    pub fn column(&self, index: usize) -> ArrayView1<'_, u32> {
        self.data.column(index)
    }

    /// Number of distinct codes per column.
    #[inline]
    pub fn cardinalities(&self) -> &[u32] {
        &self.cardinalities
    }

    /// Column descriptors, in matrix order.
    #[inline]
    pub fn columns(&self) -> &[CategoricalColumn] {
        &self.columns
    }

    /// Label code per instance.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Label cardinality.
    #[inline]
    pub fn n_labels(&self) -> u32 {
        self.label_names.len() as u32
    }

    /// Label category names.
    #[inline]
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    #[inline]
    pub fn n_instances(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn shape(&self) -> ViewShape {
        self.shape
    }

    /// Column index of the attribute called `name`.
    pub fn find_column_index(&self, name: &str) -> Result<usize, AdapterError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| AdapterError::UnknownColumn(name.to_string()))
    }
}
