//! Single-row prediction and the health check.

use crate::bundle::ModelBundle;
use crate::error::{Result, YieldError};
use crate::heuristics::{confidence, feature_importance};
use crate::types::{HealthReport, PredictionRequest, PredictionResponse};
use std::path::Path;
use tracing::{debug, warn};
use yield_processing::encode_input;

/// Predict the yield for one request.
///
/// Categorical values the encoders never saw are replaced by the first known
/// class; the response lists them in `defaulted_fields`.
pub fn predict(bundle: &ModelBundle, request: &PredictionRequest) -> Result<PredictionResponse> {
    let encoded = encode_input(&request.as_feature_input(), &bundle.encoders, &bundle.scaler)?;
    for field in &encoded.defaulted {
        warn!(
            "Unknown {} '{}', predicting as '{}'",
            field.column, field.value, field.fallback
        );
    }

    let raw = bundle.forest.predict(&encoded.values);
    if !raw.is_finite() {
        return Err(YieldError::InvalidInput(format!(
            "model produced a non-finite prediction ({raw})"
        )));
    }
    debug!("Raw forest output {:.2} for {}", raw, request.crop_type);

    Ok(PredictionResponse {
        predicted_yield: raw.trunc() as i64,
        confidence: confidence(request),
        feature_importance: feature_importance(request),
        model_version: bundle.model_version.clone(),
        defaulted_fields: encoded.defaulted,
    })
}

/// Report whether a usable artifact exists in `dir`.
///
/// A missing artifact is a normal [`HealthReport::not_trained`]; a present
/// but unreadable or mismatched one is an error.
pub fn health(dir: impl AsRef<Path>) -> Result<HealthReport> {
    match ModelBundle::load(dir) {
        Ok(_) => Ok(HealthReport::ready()),
        Err(YieldError::ModelNotTrained) => Ok(HealthReport::not_trained()),
        Err(e) => Err(e),
    }
}
