//! Training pipeline.
//!
//! A run executes these stages in order:
//!
//! 1. **Generating** - draw the synthetic dataset
//! 2. **Preprocessing** - fit encoders and scaler on the full dataset, build
//!    the feature matrix, shuffle and split it
//! 3. **Training** - fit the forest on the training split
//! 4. **Evaluating** - MAE and R² on the held-out split
//! 5. **Saving** - write the artifact files (only for [`Pipeline::train`])
//!
//! # Example
//!
//! ```rust,ignore
//! use yield_learning::{Pipeline, TrainingConfig};
//!
//! let pipeline = Pipeline::builder()
//!     .config(TrainingConfig::builder().n_trees(50).build()?)
//!     .on_progress(|u| eprintln!("[{}] {}", u.stage, u.message))
//!     .build();
//!
//! let report = pipeline.train("models/")?;
//! println!("MAE {:.2}, R² {:.4}", report.mae, report.r2);
//! ```

use crate::bundle::ModelBundle;
use crate::cancellation::CancellationToken;
use crate::config::TrainingConfig;
use crate::error::{Result, YieldError};
use crate::forest::RandomForest;
use crate::metrics::{mean_absolute_error, r2_score};
use crate::progress::{ProgressCallback, ProgressUpdate, TrainingStage};
use crate::types::TrainingReport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use yield_processing::{
    FEATURE_COLUMNS, FeatureMatrix, SyntheticGenerator, build_feature_matrix, fit_preprocessors,
};

/// A fitted bundle and its evaluation, before anything is written to disk.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub report: TrainingReport,
}

/// Runs generation, preprocessing, fitting and evaluation.
pub struct Pipeline {
    config: TrainingConfig,
    progress_callback: Option<ProgressCallback>,
    cancellation_token: Option<CancellationToken>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("cancellation_token", &self.cancellation_token)
            .finish()
    }
}

impl Pipeline {
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit a bundle and evaluate it without saving.
    ///
    /// # Errors
    ///
    /// - [`InvalidConfig`](YieldError::InvalidConfig) if the configuration is out of range
    /// - [`Cancelled`](YieldError::Cancelled) if the cancellation token fired
    /// - [`Processing`](YieldError::Processing) if generation or preprocessing failed
    pub fn fit(&self) -> Result<TrainingOutcome> {
        self.config.validate()?;

        self.report(TrainingStage::Generating, "Generating synthetic dataset");
        let df = SyntheticGenerator::new(self.config.generator_config())?.generate()?;
        self.check_cancelled()?;

        self.report(TrainingStage::Preprocessing, "Encoding and scaling features");
        let (encoders, scaler) = fit_preprocessors(&df)?;
        let matrix = build_feature_matrix(&df, &encoders, &scaler)?;
        let (train, test) = self.split(&matrix);
        self.check_cancelled()?;

        self.report(TrainingStage::Training, "Fitting random forest");
        let forest = RandomForest::fit_with(
            &train.rows,
            &train.targets,
            &self.config.forest_params(),
            |done, total| self.after_tree(done, total),
        )?;

        self.report(TrainingStage::Evaluating, "Scoring held-out split");
        let predictions = forest.predict_many(&test.rows);
        let mae = mean_absolute_error(&test.targets, &predictions);
        let r2 = r2_score(&test.targets, &predictions);
        info!("Model trained - MAE: {:.2}, R²: {:.4}", mae, r2);

        let bundle = ModelBundle::new(forest, encoders, scaler);
        let report = TrainingReport {
            mae,
            r2,
            training_samples: train.len(),
            test_samples: test.len(),
            features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            run_id: bundle.stamp.run_id.clone(),
        };
        Ok(TrainingOutcome { bundle, report })
    }

    /// Fit, evaluate and save the artifact into `model_dir`.
    pub fn train(&self, model_dir: impl AsRef<Path>) -> Result<TrainingReport> {
        let outcome = self.fit()?;
        self.check_cancelled()?;

        self.report(TrainingStage::Saving, "Writing model artifact");
        outcome.bundle.save(model_dir)?;

        self.report(TrainingStage::Complete, "Training complete");
        Ok(outcome.report)
    }

    /// Shuffle with the configured seed; the first `test` rows are held out.
    fn split(&self, matrix: &FeatureMatrix) -> (FeatureMatrix, FeatureMatrix) {
        let mut order: Vec<usize> = (0..matrix.len()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(self.config.seed));

        let (_, n_test) = self.config.split_sizes();
        let (test, train) = order.split_at(n_test.min(order.len()));
        (matrix.select(train), matrix.select(test))
    }

    fn after_tree(&self, done: usize, total: usize) -> ControlFlow<()> {
        if let Some(callback) = &self.progress_callback {
            callback(ProgressUpdate {
                stage: TrainingStage::Training,
                progress: training_progress(done, total),
                message: format!("Fitted tree {done}/{total}"),
                trees_completed: Some((done, total)),
            });
        }
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn report(&self, stage: TrainingStage, message: &str) {
        if let Some(callback) = &self.progress_callback {
            callback(ProgressUpdate::new(stage, stage.start(), message));
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(YieldError::Cancelled);
        }
        Ok(())
    }
}

/// Linear progress through the training band after `done` of `total` trees.
fn training_progress(done: usize, total: usize) -> f64 {
    let from = TrainingStage::Training.start();
    let to = TrainingStage::Evaluating.start();
    from + (to - from) * done as f64 / total as f64
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: TrainingConfig,
    progress_callback: Option<ProgressCallback>,
    cancellation_token: Option<CancellationToken>,
}

impl PipelineBuilder {
    pub fn config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    /// Receive a [`ProgressUpdate`] at each stage and after every tree.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// The configuration is validated when the pipeline runs.
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            progress_callback: self.progress_callback,
            cancellation_token: self.cancellation_token,
        }
    }
}
