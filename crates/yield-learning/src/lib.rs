//! yield-learning: crop yield model training and prediction.
//!
//! Trains a random forest on synthetic agronomic data produced by
//! [`yield_processing`], persists it with its preprocessors as one stamped
//! artifact, and serves single-row predictions annotated with heuristic
//! confidence and feature-importance scores.
//!
//! # Features
//!
//! - **Random Forest**: bagged CART regression trees, deterministic per seed
//! - **Training Pipeline**: generate, preprocess, fit, evaluate, save, with
//!   progress callbacks and cancellation
//! - **Stamped Artifacts**: three JSON files that load only as a matching set
//! - **Stateless Prediction**: [`predict`] borrows an immutable [`ModelBundle`]
//! - **Degraded-Input Reporting**: unknown categories are listed in the
//!   response instead of being swapped silently
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use yield_learning::{ModelBundle, Pipeline, PredictionRequest, TrainingConfig, predict};
//!
//! let report = Pipeline::builder()
//!     .config(TrainingConfig::default())
//!     .build()
//!     .train("models/")?;
//! println!("R² {:.3}", report.r2);
//!
//! let bundle = ModelBundle::load("models/")?;
//! let request: PredictionRequest = serde_json::from_str(r#"{
//!     "crop_type": "tomato", "growth_stage": "fruiting", "days_planting": 90,
//!     "location": "greenhouse", "temperature": 24, "humidity": 65, "light": 750
//! }"#)?;
//! let response = predict(&bundle, &request)?;
//! println!("{} ({}% confidence)", response.predicted_yield, response.confidence);
//! ```
//!
//! # Architecture
//!
//! ```text
//! TrainingConfig ──► Pipeline ──► ModelBundle ──save──► yield_model.json
//!                                     │                  scaler.json
//!                                     │                  encoders.json
//!                                     ▼
//!            PredictionRequest ──► predict() ──► PredictionResponse
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T, YieldError>`](YieldError). Only
//! [`YieldError::ModelNotTrained`] is meant to be branched on; the rest carry
//! a stable [`error_code`](YieldError::error_code) and a readable message.

pub mod bundle;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod forest;
pub mod heuristics;
pub mod metrics;
pub mod pipeline;
pub mod prediction_log;
pub mod predictor;
pub mod progress;
pub mod types;

pub use bundle::{ArtifactPaths, ArtifactStamp, MODEL_VERSION, ModelBundle};
pub use cancellation::CancellationToken;
pub use config::{TrainingConfig, TrainingConfigBuilder};
pub use error::{Result, YieldError};
pub use forest::{ForestParams, RandomForest};
pub use pipeline::{Pipeline, PipelineBuilder, TrainingOutcome};
pub use prediction_log::{PredictionLog, PredictionLogEntry};
pub use predictor::{health, predict};
pub use progress::{ProgressCallback, ProgressUpdate, TrainingStage};
pub use types::{
    FeatureImportance, HealthReport, HealthStatus, PredictionRequest, PredictionResponse,
    TrainingReport,
};

// A loaded bundle may be shared across threads for concurrent prediction.
static_assertions::assert_impl_all!(ModelBundle: Send, Sync);
static_assertions::assert_impl_all!(Pipeline: Send, Sync);
