//! Deterministic synthetic datasets for unit and integration tests.

mod data;

pub use data::{correlated_nominal, random_classification, random_regression, xor_dataset};
