//! Error types for dataset generation and feature preprocessing.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProcessingError {
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every value of the column was null, so nothing could be fitted.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// The encoder was deserialized without any classes.
    #[error("Encoder for '{0}' has no known categories")]
    EmptyEncoder(String),

    /// A deserialized encoder or scaler whose contents cannot be used.
    #[error("Invalid fitted state: {0}")]
    InvalidState(String),

    #[error("Expected {expected} numeric features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("Could not write dataset to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ProcessingError {
    /// Stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::EmptyEncoder(_) => "EMPTY_ENCODER",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::FeatureCountMismatch { .. } => "FEATURE_COUNT_MISMATCH",
            Self::Export { .. } => "EXPORT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

// Serialized as `{"code": ..., "message": ...}` for callers that forward
// errors as JSON.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
