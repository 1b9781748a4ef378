//! Fully categorical views of a node's instances.
//!
//! The multivariate uncertainty score is defined over discrete variables only.
//! [`CategoricalView`] turns the instances reaching a node into an integer
//! matrix: nominal attributes keep their codes, numeric attributes are
//! discretized with [`MdlDiscretizer`] against the node's own labels.
//!
//! Views are rebuilt from scratch at every node; cut points found for a parent
//! are never reused by its children.

mod discretize;
mod view;

pub use discretize::MdlDiscretizer;
pub use view::{AdapterError, CategoricalColumn, CategoricalView, ColumnOrigin, ViewShape};
