//! Request, response and report types exchanged with callers.
//!
//! Every type here serializes to the JSON shape printed by the
//! `yield-predictor` binary.

use serde::{Deserialize, Serialize};
use yield_processing::{DefaultedCategory, FeatureInput};

/// One sample to predict: a training record without its yield.
///
/// Numeric fields accept JSON integers as well as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub crop_type: String,
    pub growth_stage: String,
    pub days_planting: f64,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
}

impl PredictionRequest {
    pub fn as_feature_input(&self) -> FeatureInput<'_> {
        FeatureInput {
            crop_type: &self.crop_type,
            growth_stage: &self.growth_stage,
            days_planting: self.days_planting,
            location: &self.location,
            temperature: self.temperature,
            humidity: self.humidity,
            light: self.light,
        }
    }
}

/// Per-request feature weights in percent.
///
/// Fields serialize in declaration order, so the JSON object always carries
/// exactly these seven keys.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
    pub growth_stage: f64,
    pub days_planting: f64,
    pub location: f64,
    pub crop_type: f64,
}

impl FeatureImportance {
    /// `(name, percentage)` pairs in serialization order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("light", self.light),
            ("growth_stage", self.growth_stage),
            ("days_planting", self.days_planting),
            ("location", self.location),
            ("crop_type", self.crop_type),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, value)| value).sum()
    }
}

/// Result of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Forest output truncated toward zero.
    pub predicted_yield: i64,
    /// Heuristic confidence in percent, within `[50, 95]`.
    pub confidence: f64,
    pub feature_importance: FeatureImportance,
    pub model_version: String,
    /// Categorical inputs the encoders did not know; empty for a clean request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted_fields: Vec<DefaultedCategory>,
}

impl PredictionResponse {
    pub fn is_degraded(&self) -> bool {
        !self.defaulted_fields.is_empty()
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Mean absolute error on the held-out split.
    pub mae: f64,
    /// R² on the held-out split.
    pub r2: f64,
    pub training_samples: usize,
    pub test_samples: usize,
    /// Model input columns in the order the forest consumes them.
    pub features: Vec<String>,
    /// Identifier stamped on every artifact file written by this run.
    pub run_id: String,
}

/// Whether a usable artifact is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ready,
    NotTrained,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthReport {
    pub fn ready() -> Self {
        Self {
            status: HealthStatus::Ready,
            message: "Model loaded successfully".to_string(),
        }
    }

    pub fn not_trained() -> Self {
        Self {
            status: HealthStatus::NotTrained,
            message: "Model not trained".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_accepts_integer_numbers() {
        let request: PredictionRequest = serde_json::from_str(
            r#"{"crop_type":"tomato","growth_stage":"fruiting","days_planting":90,
                "location":"greenhouse","temperature":24,"humidity":65,"light":750}"#,
        )
        .unwrap();
        assert_eq!(request.days_planting, 90.0);
        assert_eq!(request.light, 750.0);
        assert_eq!(request.as_feature_input().location, "greenhouse");
    }

    #[test]
    fn test_request_missing_field_rejected() {
        let result: Result<PredictionRequest, _> =
            serde_json::from_str(r#"{"crop_type":"tomato"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_feature_importance_key_order() {
        let json = serde_json::to_string(&FeatureImportance::default()).unwrap();
        assert_eq!(
            json,
            r#"{"temperature":0.0,"humidity":0.0,"light":0.0,"growth_stage":0.0,"days_planting":0.0,"location":0.0,"crop_type":0.0}"#
        );
    }

    #[test]
    fn test_defaulted_fields_omitted_when_empty() {
        let response = PredictionResponse {
            predicted_yield: 41_000,
            confidence: 95.0,
            feature_importance: FeatureImportance::default(),
            model_version: "v".to_string(),
            defaulted_fields: Vec::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("defaulted_fields").is_none());
        assert!(!response.is_degraded());
    }

    #[test]
    fn test_health_report_json() {
        assert_eq!(
            serde_json::to_string(&HealthReport::ready()).unwrap(),
            r#"{"status":"ready","message":"Model loaded successfully"}"#
        );
        assert_eq!(
            serde_json::to_string(&HealthReport::not_trained()).unwrap(),
            r#"{"status":"not_trained","message":"Model not trained"}"#
        );
    }
}
