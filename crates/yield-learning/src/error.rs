//! Error types for the yield-learning crate.
//!
//! [`YieldError`] is returned by every fallible public function. Callers that
//! need to branch on a condition should match [`YieldError::ModelNotTrained`];
//! everything else is meant to be reported, usually through
//! [`YieldError::error_code`] and the `Display` message.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;
use yield_processing::ProcessingError;

/// The main error type for yield-learning operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum YieldError {
    /// No trained artifact exists in the model directory.
    #[error("Model not trained. Run `train` first.")]
    ModelNotTrained,

    /// The artifact files exist but do not belong to the same training run,
    /// or were written by an incompatible format version.
    #[error("Inconsistent model artifact: {0}")]
    InconsistentArtifact(String),

    /// Invalid configuration provided to the training pipeline.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The prediction request could not be understood.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Training could not produce a model.
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// Training was stopped through a [`CancellationToken`](crate::CancellationToken).
    #[error("Training cancelled")]
    Cancelled,

    /// An artifact file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by dataset generation or preprocessing.
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl YieldError {
    /// Stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ModelNotTrained => "MODEL_NOT_TRAINED",
            Self::InconsistentArtifact(_) => "INCONSISTENT_ARTIFACT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::TrainingFailed(_) => "TRAINING_FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Artifact { .. } => "ARTIFACT_IO_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Processing(e) => e.error_code(),
        }
    }

    /// Whether this error means no model has been trained yet.
    pub fn is_not_trained(&self) -> bool {
        matches!(self, Self::ModelNotTrained)
    }
}

impl Serialize for YieldError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("YieldError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for yield-learning operations.
pub type Result<T> = std::result::Result<T, YieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_trained_message() {
        let error = YieldError::ModelNotTrained;
        assert_eq!(error.to_string(), "Model not trained. Run `train` first.");
        assert!(error.is_not_trained());
        assert_eq!(error.error_code(), "MODEL_NOT_TRAINED");
    }

    #[test]
    fn test_processing_error_code_passes_through() {
        let error: YieldError = ProcessingError::ColumnNotFound("light".to_string()).into();
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(error.to_string(), "Column 'light' not found in dataset");
        assert!(!error.is_not_trained());
    }

    #[test]
    fn test_error_serialization() {
        let error = YieldError::InconsistentArtifact("stamp mismatch".to_string());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["code"], "INCONSISTENT_ARTIFACT");
        assert_eq!(json["message"], "Inconsistent model artifact: stamp mismatch");
    }
}
