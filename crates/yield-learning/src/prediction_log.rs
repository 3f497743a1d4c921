//! Append-only JSON Lines record of served predictions.

use crate::error::{Result, YieldError};
use crate::types::{PredictionRequest, PredictionResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One line of the prediction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub request: PredictionRequest,
    pub predicted_yield: i64,
    pub confidence: f64,
    pub model_version: String,
}

impl PredictionLogEntry {
    pub fn new(request: &PredictionRequest, response: &PredictionResponse) -> Self {
        Self {
            timestamp: Utc::now(),
            request: request.clone(),
            predicted_yield: response.predicted_yield,
            confidence: response.confidence,
            model_version: response.model_version.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file if needed.
    pub fn append(
        &self,
        request: &PredictionRequest,
        response: &PredictionResponse,
    ) -> Result<()> {
        let mut line = serde_json::to_vec(&PredictionLogEntry::new(request, response))?;
        line.push(b'\n');

        let artifact_error = |source: std::io::Error| YieldError::Artifact {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(artifact_error)?;
        file.write_all(&line).map_err(artifact_error)
    }

    /// Read every entry back, oldest first.
    pub fn read_all(&self) -> Result<Vec<PredictionLogEntry>> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| YieldError::Artifact {
                path: self.path.clone(),
                source,
            })?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(YieldError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureImportance;

    fn request() -> PredictionRequest {
        PredictionRequest {
            crop_type: "lettuce".to_string(),
            growth_stage: "vegetative".to_string(),
            days_planting: 45.0,
            location: "lot-b".to_string(),
            temperature: 20.0,
            humidity: 75.0,
            light: 500.0,
        }
    }

    fn response(predicted_yield: i64) -> PredictionResponse {
        PredictionResponse {
            predicted_yield,
            confidence: 95.0,
            feature_importance: FeatureImportance::default(),
            model_version: "yield-forest-v1.0".to_string(),
            defaulted_fields: Vec::new(),
        }
    }

    #[test]
    fn test_append_accumulates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("predictions.jsonl"));

        log.append(&request(), &response(18_000)).unwrap();
        log.append(&request(), &response(19_500)).unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].predicted_yield, 18_000);
        assert_eq!(entries[1].predicted_yield, 19_500);
        assert_eq!(entries[1].request, request());
        assert_eq!(entries[0].model_version, "yield-forest-v1.0");
    }

    #[test]
    fn test_unwritable_path_reports_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("missing").join("log.jsonl"));
        let err = log.append(&request(), &response(1)).unwrap_err();
        assert_eq!(err.error_code(), "ARTIFACT_IO_ERROR");
    }
}
