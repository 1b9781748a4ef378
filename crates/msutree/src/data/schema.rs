//! Attribute type definitions.
//!
//! This module defines the schema types that describe dataset structure.

use std::collections::HashMap;
use std::fmt;

/// Logical attribute kinds.
///
/// Values are stored as `f64` regardless of kind. The kind indicates how to
/// interpret them during split search and categorical conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    /// Nominal attribute with an ordered set of category names.
    ///
    /// Values are category codes: `0.0, 1.0, ..., n_categories - 1.0`.
    Nominal { categories: Vec<String> },

    /// Continuous numeric attribute.
    Numeric,

    /// Date attribute, stored as a numeric timestamp and treated as numeric.
    Date,

    /// Free-text attribute. Representable, but no learner in this crate accepts it.
    String,
}

impl AttributeKind {
    /// Returns true for nominal attributes.
    #[inline]
    pub fn is_nominal(&self) -> bool {
        matches!(self, AttributeKind::Nominal { .. })
    }

    /// Returns true for attributes whose values are ordered numbers (numeric and date).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeKind::Numeric | AttributeKind::Date)
    }

    /// Number of categories (0 for non-nominal kinds).
    #[inline]
    pub fn n_categories(&self) -> usize {
        match self {
            AttributeKind::Nominal { categories } => categories.len(),
            _ => 0,
        }
    }

    /// Category names (empty for non-nominal kinds).
    pub fn categories(&self) -> &[String] {
        match self {
            AttributeKind::Nominal { categories } => categories,
            _ => &[],
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Nominal { .. } => "nominal",
            AttributeKind::Numeric => "numeric",
            AttributeKind::Date => "date",
            AttributeKind::String => "string",
        };
        f.write_str(name)
    }
}

/// Metadata for a single attribute (predictor or target).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMeta {
    /// Attribute name. Names are unique within a schema.
    pub name: String,

    /// Attribute kind.
    pub kind: AttributeKind,
}

impl AttributeMeta {
    /// Create metadata for a nominal attribute.
    pub fn nominal<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal {
                categories: categories.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Create metadata for a numeric attribute.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Create metadata for a date attribute.
    pub fn date(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Date,
        }
    }

    /// Create metadata for a string attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::String,
        }
    }

    #[inline]
    pub fn is_nominal(&self) -> bool {
        self.kind.is_nominal()
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }
}

/// Schema describing the dataset structure.
///
/// Holds the predictor attributes (indexed by attribute id `0..n_attributes`)
/// and the target descriptor, plus a name → id lookup.
#[derive(Clone, Debug)]
pub struct DatasetSchema {
    attributes: Vec<AttributeMeta>,
    target: AttributeMeta,
    name_index: HashMap<String, usize>,
}

impl DatasetSchema {
    /// Create a schema from predictor metadata and a target descriptor.
    pub fn new(attributes: Vec<AttributeMeta>, target: AttributeMeta) -> Self {
        let name_index = attributes
            .iter()
            .enumerate()
            .map(|(i, meta)| (meta.name.clone(), i))
            .collect();
        Self {
            attributes,
            target,
            name_index,
        }
    }

    /// Number of predictor attributes.
    #[inline]
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Metadata for a predictor by id.
    #[inline]
    pub fn attribute(&self, id: usize) -> &AttributeMeta {
        &self.attributes[id]
    }

    /// All predictor metadata, ordered by id.
    #[inline]
    pub fn attributes(&self) -> &[AttributeMeta] {
        &self.attributes
    }

    /// Target descriptor.
    #[inline]
    pub fn target(&self) -> &AttributeMeta {
        &self.target
    }

    /// Number of target classes (0 for a numeric target).
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.target.kind.n_categories()
    }

    /// Predictor id by name.
    pub fn attribute_id(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }
}
