//! Progress reporting types for the training pipeline.
//!
//! A [`Pipeline`](crate::Pipeline) reports a [`ProgressUpdate`] at every stage
//! boundary and after each fitted tree. The CLI forwards these to `tracing`
//! at debug level; library callers can drive a progress bar from them.
//!
//! # Example
//!
//! ```
//! use yield_learning::{Pipeline, ProgressUpdate};
//!
//! let pipeline = Pipeline::builder()
//!     .on_progress(|update: ProgressUpdate| {
//!         eprintln!("[{}] {:.0}% {}", update.stage, update.progress * 100.0, update.message);
//!     })
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

/// The current stage of a training run.
///
/// Stages run in declaration order. Failures surface as errors from
/// [`Pipeline::train`](crate::Pipeline::train), not as a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[non_exhaustive]
pub enum TrainingStage {
    /// Drawing the synthetic dataset.
    #[default]
    Generating,
    /// Fitting encoders and scaler, assembling the feature matrix.
    Preprocessing,
    /// Fitting the forest.
    Training,
    /// Scoring the held-out split.
    Evaluating,
    /// Writing the artifact files.
    Saving,
    /// The run finished and the artifact is on disk.
    Complete,
}

impl TrainingStage {
    pub const ALL: [TrainingStage; 6] = [
        TrainingStage::Generating,
        TrainingStage::Preprocessing,
        TrainingStage::Training,
        TrainingStage::Evaluating,
        TrainingStage::Saving,
        TrainingStage::Complete,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStage::Generating => "generating",
            TrainingStage::Preprocessing => "preprocessing",
            TrainingStage::Training => "training",
            TrainingStage::Evaluating => "evaluating",
            TrainingStage::Saving => "saving",
            TrainingStage::Complete => "complete",
        }
    }

    /// Overall progress at the moment this stage begins.
    ///
    /// Tree fitting dominates a run, so [`Training`](Self::Training) owns the
    /// band from 0.2 up to [`Evaluating`](Self::Evaluating).
    #[must_use]
    pub fn start(&self) -> f64 {
        match self {
            TrainingStage::Generating => 0.0,
            TrainingStage::Preprocessing => 0.1,
            TrainingStage::Training => 0.2,
            TrainingStage::Evaluating => 0.8,
            TrainingStage::Saving => 0.9,
            TrainingStage::Complete => 1.0,
        }
    }
}

impl fmt::Display for TrainingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A progress update from the training pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressUpdate {
    pub stage: TrainingStage,

    /// Overall progress from 0.0 to 1.0, non-decreasing within a run.
    pub progress: f64,

    /// Human-readable status message.
    pub message: String,

    /// `(fitted, total)` trees; only set during [`TrainingStage::Training`].
    pub trees_completed: Option<(usize, usize)>,
}

impl ProgressUpdate {
    pub fn new(stage: TrainingStage, progress: f64, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress,
            message: message.into(),
            trees_completed: None,
        }
    }
}

/// Callback receiving [`ProgressUpdate`]s. Must be `Send + Sync`.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let names: Vec<String> = TrainingStage::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "generating",
                "preprocessing",
                "training",
                "evaluating",
                "saving",
                "complete"
            ]
        );
    }

    #[test]
    fn test_stage_start_follows_declaration_order() {
        assert!(TrainingStage::ALL.windows(2).all(|w| w[0] < w[1]));
        assert!(
            TrainingStage::ALL
                .windows(2)
                .all(|w| w[0].start() < w[1].start())
        );
        assert_eq!(TrainingStage::Complete.start(), 1.0);
    }

    #[test]
    fn test_progress_update_default() {
        let update = ProgressUpdate::default();
        assert_eq!(update.stage, TrainingStage::Generating);
        assert_eq!(update.progress, 0.0);
        assert!(update.message.is_empty());
        assert!(update.trees_completed.is_none());
    }
}
