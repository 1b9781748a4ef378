//! Training data abstractions.
//!
//! # Overview
//!
//! - [`Dataset`]: immutable weighted instances, attribute-major storage
//! - [`DatasetSchema`] / [`AttributeMeta`] / [`AttributeKind`]: attribute descriptors
//! - [`InstanceSubset`]: the weighted view of the instances reaching a tree node
//! - [`categorical`]: per-node conversion of a subset into a fully categorical
//!   matrix (supervised discretization of numeric attributes)
//!
//! # Missing Values
//!
//! Missing values are represented as `f64::NAN`, for predictors and target.

pub mod categorical;
mod dataset;
mod schema;
mod subset;

pub use categorical::{
    AdapterError, CategoricalColumn, CategoricalView, ColumnOrigin, MdlDiscretizer, ViewShape,
};
pub use dataset::{Dataset, DatasetBuilder, DatasetError};
pub use schema::{AttributeKind, AttributeMeta, DatasetSchema};
pub use subset::InstanceSubset;
