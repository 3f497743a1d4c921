//! Configuration for the training pipeline.
//!
//! # Example
//!
//! ```
//! use yield_learning::TrainingConfig;
//!
//! let config = TrainingConfig::builder()
//!     .n_samples(500)
//!     .n_trees(20)
//!     .seed(7)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.split_sizes(), (400, 100));
//! ```

use crate::error::{Result, YieldError};
use crate::forest::ForestParams;
use serde::{Deserialize, Serialize};
use yield_processing::GeneratorConfig;

/// Settings for one training run.
///
/// The defaults reproduce the reference model: 2000 synthetic samples, seed
/// 42, 100 trees of depth at most 10, and an 80/20 train/test split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of synthetic samples to generate (default: 2000).
    pub n_samples: usize,

    /// Seed shared by the generator, the split shuffle and the forest
    /// (default: 42).
    pub seed: u64,

    /// Number of trees in the forest (default: 100).
    pub n_trees: usize,

    /// Maximum depth of each tree; the root is depth 0 (default: 10).
    pub max_depth: usize,

    /// A node with fewer samples than this becomes a leaf (default: 5).
    pub min_samples_split: usize,

    /// Each child of a split keeps at least this many samples (default: 2).
    pub min_samples_leaf: usize,

    /// Fraction of samples held out for evaluation (default: 0.2).
    ///
    /// Must be in `(0.0, 1.0)`.
    pub test_size: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_samples: 2000,
            seed: 42,
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            test_size: 0.2,
        }
    }
}

impl TrainingConfig {
    #[must_use]
    pub fn builder() -> TrainingConfigBuilder {
        TrainingConfigBuilder::default()
    }

    /// Check every constraint the builder enforces.
    pub fn validate(&self) -> Result<()> {
        if self.n_samples < 2 {
            return Err(YieldError::InvalidConfig(
                "n_samples must be at least 2".to_string(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(YieldError::InvalidConfig(format!(
                "test_size must be between 0.0 and 1.0 (exclusive), got {}",
                self.test_size
            )));
        }
        if self.n_trees == 0 {
            return Err(YieldError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(YieldError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(YieldError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(YieldError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        let (train, test) = self.split_sizes();
        if train == 0 || test == 0 {
            return Err(YieldError::InvalidConfig(format!(
                "a test_size of {} leaves an empty split for {} samples",
                self.test_size, self.n_samples
            )));
        }
        Ok(())
    }

    /// `(train, test)` row counts. The test side is rounded up.
    pub fn split_sizes(&self) -> (usize, usize) {
        let test = ((self.n_samples as f64) * self.test_size).ceil() as usize;
        let test = test.min(self.n_samples);
        (self.n_samples - test, test)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.n_samples, self.seed)
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
        }
    }
}

/// Builder for [`TrainingConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainingConfigBuilder {
    config: TrainingConfig,
}

impl TrainingConfigBuilder {
    pub fn n_samples(mut self, n: usize) -> Self {
        self.config.n_samples = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn n_trees(mut self, n: usize) -> Self {
        self.config.n_trees = n;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.config.min_samples_split = n;
        self
    }

    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.config.min_samples_leaf = n;
        self
    }

    pub fn test_size(mut self, size: f64) -> Self {
        self.config.test_size = size;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`YieldError::InvalidConfig`] if any value is out of range.
    pub fn build(self) -> Result<TrainingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
