//! Data capability checks.
//!
//! Describes which datasets a learner accepts and reports the first violation.

use crate::data::{AttributeKind, Dataset};

/// Dataset properties a learner cannot handle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapabilityError {
    #[error("cannot handle {kind} attribute '{name}'")]
    UnsupportedAttribute { name: String, kind: AttributeKind },

    #[error("cannot handle {kind} class '{name}'")]
    UnsupportedClass { name: String, kind: AttributeKind },

    #[error("cannot handle missing values (attribute '{attribute}')")]
    MissingValues { attribute: String },

    #[error("cannot handle missing class values")]
    MissingClassValues,

    #[error("not enough training instances: need at least {required}, got {got}")]
    NotEnoughInstances { required: usize, got: usize },
}

/// Kinds of attribute a capability set can enable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSet {
    pub nominal: bool,
    pub numeric: bool,
    pub date: bool,
    pub string: bool,
}

impl KindSet {
    #[inline]
    pub fn allows(&self, kind: &AttributeKind) -> bool {
        match kind {
            AttributeKind::Nominal { .. } => self.nominal,
            AttributeKind::Numeric => self.numeric,
            AttributeKind::Date => self.date,
            AttributeKind::String => self.string,
        }
    }
}

/// What a learner accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub attributes: KindSet,
    pub class: KindSet,
    pub missing_values: bool,
    pub missing_class_values: bool,
    pub min_instances: usize,
}

impl Capabilities {
    /// Capabilities of the MSU tree: nominal, numeric and date attributes,
    /// nominal class, no missing values, at least one instance.
    pub fn msu_tree() -> Self {
        Self {
            attributes: KindSet {
                nominal: true,
                numeric: true,
                date: true,
                string: false,
            },
            class: KindSet {
                nominal: true,
                ..KindSet::default()
            },
            missing_values: false,
            missing_class_values: false,
            min_instances: 1,
        }
    }

    /// Check `dataset`, returning the first violation.
    pub fn check(&self, dataset: &Dataset) -> Result<(), CapabilityError> {
        let schema = dataset.schema();

        let target = schema.target();
        if !self.class.allows(&target.kind) {
            return Err(CapabilityError::UnsupportedClass {
                name: target.name.clone(),
                kind: target.kind.clone(),
            });
        }

        for meta in schema.attributes() {
            if !self.attributes.allows(&meta.kind) {
                return Err(CapabilityError::UnsupportedAttribute {
                    name: meta.name.clone(),
                    kind: meta.kind.clone(),
                });
            }
        }

        if !self.missing_values {
            for (id, meta) in schema.attributes().iter().enumerate() {
                if dataset.attribute_values(id).iter().any(|v| v.is_nan()) {
                    return Err(CapabilityError::MissingValues {
                        attribute: meta.name.clone(),
                    });
                }
            }
        }

        if !self.missing_class_values && dataset.has_missing_targets() {
            return Err(CapabilityError::MissingClassValues);
        }

        if dataset.n_instances() < self.min_instances {
            return Err(CapabilityError::NotEnoughInstances {
                required: self.min_instances,
                got: dataset.n_instances(),
            });
        }

        Ok(())
    }
}
