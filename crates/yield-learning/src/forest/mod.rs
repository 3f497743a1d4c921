//! Random forest regressor.
//!
//! Each tree is a CART regression tree fit on a bootstrap sample of the
//! training rows; the forest predicts the mean of its trees. Fitting is
//! deterministic for a given [`ForestParams::seed`].
//!
//! # Example
//!
//! ```
//! use yield_learning::forest::{ForestParams, RandomForest};
//!
//! let x: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64]).collect();
//! let y: Vec<f64> = (0..50).map(|i| 2.0 * i as f64).collect();
//!
//! let params = ForestParams { n_trees: 10, ..ForestParams::default() };
//! let forest = RandomForest::fit(&x, &y, &params).unwrap();
//! assert!((forest.predict(&[25.0]) - 50.0).abs() < 10.0);
//! ```

mod tree;

pub use tree::{Node, RegressionTree, TreeParams};

use crate::error::{Result, YieldError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::debug;

/// Hyperparameters of a [`RandomForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// A fitted bagged ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit a forest on rows `x` with targets `y`.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self> {
        Self::fit_with(x, y, params, |_, _| ControlFlow::Continue(()))
    }

    /// Fit a forest, calling `after_tree(fitted, total)` after each tree.
    ///
    /// Returning [`ControlFlow::Break`] stops fitting with
    /// [`YieldError::Cancelled`].
    pub fn fit_with<F>(
        x: &[Vec<f64>],
        y: &[f64],
        params: &ForestParams,
        mut after_tree: F,
    ) -> Result<Self>
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        if x.is_empty() {
            return Err(YieldError::TrainingFailed(
                "cannot fit a forest on zero rows".to_string(),
            ));
        }
        if x.len() != y.len() {
            return Err(YieldError::TrainingFailed(format!(
                "{} feature rows but {} targets",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        if let Some(row) = x.iter().position(|row| row.len() != n_features) {
            return Err(YieldError::TrainingFailed(format!(
                "row {} has {} features, expected {}",
                row,
                x[row].len(),
                n_features
            )));
        }
        if params.n_trees == 0 {
            return Err(YieldError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let tree_params = params.tree_params();
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let sample: Vec<usize> = (0..x.len()).map(|_| rng.gen_range(0..x.len())).collect();
            trees.push(RegressionTree::fit(x, y, &sample, &tree_params));
            if after_tree(trees.len(), params.n_trees).is_break() {
                return Err(YieldError::Cancelled);
            }
        }

        debug!(
            "Fitted {} trees on {} rows x {} features",
            trees.len(),
            x.len(),
            n_features
        );

        Ok(Self {
            params: *params,
            n_features,
            trees,
        })
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Mean prediction of all trees for one row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn predict_many(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Structural check applied to forests read from disk.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(YieldError::InconsistentArtifact(
                "forest contains no trees".to_string(),
            ));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|reason| {
                YieldError::InconsistentArtifact(format!("tree {index}: {reason}"))
            })?;
        }
        Ok(())
    }
}
