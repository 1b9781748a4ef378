//! Tree growth parameters.
//!
//! [`TreeParams`] is built with the `bon` builder and validated at
//! [`build`](TreeParamsBuilder::build) time. It also derives `serde` so a host
//! can load it from a config file; deserialized values are re-validated when
//! training starts.
//!
//! # Example
//!
//! ```
//! use msutree::training::TreeParams;
//!
//! let params = TreeParams::builder()
//!     .n_candidates(3)
//!     .max_depth(8)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.resolve_k(10), 3);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

// =============================================================================
// ConfigError
// =============================================================================

/// Invalid parameter values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `min_instances` must be finite and non-negative.
    #[error("min_instances must be finite and non-negative, got {0}")]
    InvalidMinInstances(f64),

    /// `min_variance_prop` must be finite and non-negative.
    #[error("min_variance_prop must be finite and non-negative, got {0}")]
    InvalidMinVarianceProp(f64),
}

// =============================================================================
// TreeParams
// =============================================================================

/// Parameters for growing one MSU tree.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[serde(default)]
pub struct TreeParams {
    /// Candidate attributes examined per node (K). Default: 0 (automatic).
    ///
    /// Values above the number of predictors are clamped to it; 0 selects
    /// `floor(log2(n_predictors)) + 1`. See [`resolve_k`](Self::resolve_k).
    #[builder(default)]
    pub n_candidates: usize,

    /// Minimum total weight of a leaf. Default: 1.0.
    ///
    /// A node with total weight below `2 * min_instances` is not split.
    #[builder(default = 1.0)]
    pub min_instances: f64,

    /// Minimum variance proportion for numeric targets. Default: 1e-3.
    ///
    /// A node is not split once its per-weight variance falls below this
    /// fraction of the training-set variance.
    #[builder(default = 1e-3)]
    pub min_variance_prop: f64,

    /// Maximum depth. Default: 0 (unlimited).
    #[builder(default)]
    pub max_depth: usize,

    /// Random seed for attribute draws. Default: 1.
    #[builder(default = 1)]
    pub seed: u64,

    /// Leave ties to draw order instead of preferring the lower attribute id.
    /// Default: false.
    #[builder(default)]
    pub break_ties_randomly: bool,

    /// Predict a zero vector (NaN for numeric targets) instead of nothing
    /// when an instance reaches a branch never seen in training. Default: false.
    #[builder(default)]
    pub allow_unclassified: bool,

    /// Skip the capability check before training. Default: false.
    ///
    /// Ensembles check the data once and train their trees with this set.
    /// It is also the only way to train on numeric targets or data with
    /// missing values.
    #[builder(default)]
    pub do_not_check_capabilities: bool,
}

impl<S: tree_params_builder::IsComplete> TreeParamsBuilder<S> {
    /// Build and validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `min_instances` or `min_variance_prop` is
    /// negative or not finite.
    pub fn build(self) -> Result<TreeParams, ConfigError> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl TreeParams {
    /// Validate parameter values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_instances.is_finite() || self.min_instances < 0.0 {
            return Err(ConfigError::InvalidMinInstances(self.min_instances));
        }
        if !self.min_variance_prop.is_finite() || self.min_variance_prop < 0.0 {
            return Err(ConfigError::InvalidMinVarianceProp(self.min_variance_prop));
        }
        Ok(())
    }

    /// Number of candidates drawn per node for `n_predictors` predictors.
    pub fn resolve_k(&self, n_predictors: usize) -> usize {
        if n_predictors == 0 {
            return 0;
        }
        let mut k = self.n_candidates.min(n_predictors);
        if k < 1 {
            k = (n_predictors as f64).log2().floor() as usize + 1;
        }
        k
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::builder().build().expect("default params are valid")
    }
}
