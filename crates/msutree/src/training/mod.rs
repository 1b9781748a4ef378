//! Training infrastructure for MSU trees.
//!
//! ## Entry Point
//!
//! - [`MsuTreeTrainer`]: validates data and parameters, then grows one tree
//! - [`TreeParams`]: growth parameters (bon builder, serde)
//! - [`Capabilities`]: which datasets the trainer accepts
//!
//! ## Growth Machinery
//!
//! - [`TreeGrower`]: recursive node construction
//! - [`AttributeWindow`]: candidate attributes, shared by all nodes of a tree
//! - [`SelectedPath`]: categorical columns chosen from the root to a node
//! - [`UncertaintyOracle`] / [`MultivariateSymmetricalUncertainty`]: candidate scoring
//! - [`split`]: per-attribute split search and instance partitioning
//!
//! ## Logging
//!
//! Progress is reported through `tracing`: `info` at the start and end of
//! training, `debug` for every split and leaf, `trace` for every candidate.
//! No subscriber is installed by this crate.

mod capabilities;
mod grower;
mod msu;
mod params;
mod path;
pub mod split;
mod trainer;
mod window;

pub use capabilities::{Capabilities, CapabilityError, KindSet};
pub use grower::TreeGrower;
pub use msu::{MultivariateSymmetricalUncertainty, UncertaintyOracle};
pub use params::{ConfigError, TreeParams, TreeParamsBuilder};
pub use path::SelectedPath;
pub use split::AttributeSplit;
pub use trainer::{MsuTreeTrainer, TrainError};
pub use window::{AttributeWindow, WindowCursor};
