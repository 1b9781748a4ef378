//! msutree: randomized decision trees split by multivariate symmetrical uncertainty.
//!
//! At each node the tree scores a candidate attribute by how much the *joint*
//! set of attributes chosen on the path from the root, plus the candidate,
//! tells about the class. Attribute interactions that univariate criteria
//! miss (XOR-like structure) become visible once one side of the interaction
//! is on the path.
//!
//! # Key Types
//!
//! - [`Dataset`] - Weighted training instances with nominal, numeric and date attributes
//! - [`TreeParams`] - Growth parameters (builder + serde)
//! - [`MsuTreeTrainer`] - Trains one tree
//! - [`MsuTree`] - The trained model: prediction, validation, text rendering
//!
//! # Training
//!
//! ```
//! use msutree::{Dataset, MsuTreeTrainer, TreeParams};
//! use ndarray::array;
//!
//! let dataset = Dataset::builder()
//!     .add_nominal("outlook", ["sunny", "rainy"], array![0.0, 0.0, 1.0, 1.0].view())
//!     .add_numeric("temperature", array![30.0, 25.0, 18.0, 15.0].view())
//!     .nominal_target("play", ["no", "yes"], array![0.0, 0.0, 1.0, 1.0].view())
//!     .build()
//!     .unwrap();
//!
//! let params = TreeParams::builder().n_candidates(2).seed(1).build().unwrap();
//! let tree = MsuTreeTrainer::new(params).train(&dataset).unwrap();
//! assert_eq!(tree.predict(&[1.0, 16.0]), Some(1.0));
//! ```

pub mod data;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{
    AttributeKind, AttributeMeta, CategoricalView, Dataset, DatasetBuilder, DatasetError,
    DatasetSchema, InstanceSubset,
};
pub use repr::{MsuTree, TreeValidationError};
pub use training::{MsuTreeTrainer, TrainError, TreeParams};
