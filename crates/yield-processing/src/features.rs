//! Feature matrix assembly.
//!
//! Turns the raw dataset (or a single raw input) into the numeric layout the
//! regressor consumes: categorical columns label-encoded, numeric columns
//! standardized, all in [`FEATURE_COLUMNS`] order.

use crate::encoding::{CategoricalEncoders, Encoded, LabelEncoder, StandardScaler};
use crate::error::{ProcessingError, Result};
use crate::types::{
    CROP_TYPE, DAYS_PLANTING, FEATURE_COLUMNS, GROWTH_STAGE, HUMIDITY, LIGHT, LOCATION,
    NUMERIC_COLUMNS, TEMPERATURE, YIELD,
};
use crate::utils::{float_values, string_values};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Row-major model inputs with their targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    pub rows: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Copy the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Raw, unencoded values of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureInput<'a> {
    pub crop_type: &'a str,
    pub growth_stage: &'a str,
    pub days_planting: f64,
    pub location: &'a str,
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
}

/// A categorical input that was unknown to its encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultedCategory {
    pub column: String,
    pub value: String,
    pub fallback: String,
}

/// One encoded sample plus any categories that had to be defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    pub values: Vec<f64>,
    pub defaulted: Vec<DefaultedCategory>,
}

impl EncodedRow {
    pub fn is_degraded(&self) -> bool {
        !self.defaulted.is_empty()
    }
}

/// Fit encoders and scaler on a training dataset.
pub fn fit_preprocessors(df: &DataFrame) -> Result<(CategoricalEncoders, StandardScaler)> {
    let encoders = CategoricalEncoders::fit(df)?;
    let scaler = StandardScaler::fit(df, &NUMERIC_COLUMNS)?;
    Ok((encoders, scaler))
}

/// Encode and scale every row of `df`; the `yield` column becomes the target.
pub fn build_feature_matrix(
    df: &DataFrame,
    encoders: &CategoricalEncoders,
    scaler: &StandardScaler,
) -> Result<FeatureMatrix> {
    let crop_types = string_values(df, CROP_TYPE)?;
    let growth_stages = string_values(df, GROWTH_STAGE)?;
    let locations = string_values(df, LOCATION)?;
    let days = float_values(df, DAYS_PLANTING)?;
    let temperatures = float_values(df, TEMPERATURE)?;
    let humidities = float_values(df, HUMIDITY)?;
    let lights = float_values(df, LIGHT)?;
    let targets = float_values(df, YIELD)?;

    let mut rows = Vec::with_capacity(df.height());
    let mut defaulted = 0usize;

    for i in 0..df.height() {
        let input = FeatureInput {
            crop_type: &crop_types[i],
            growth_stage: &growth_stages[i],
            days_planting: days[i],
            location: &locations[i],
            temperature: temperatures[i],
            humidity: humidities[i],
            light: lights[i],
        };
        let encoded = encode_input(&input, encoders, scaler)?;
        defaulted += encoded.defaulted.len();
        rows.push(encoded.values);
    }

    if defaulted > 0 {
        warn!("{} categorical values were unknown to the encoders", defaulted);
    }

    Ok(FeatureMatrix { rows, targets })
}

/// Encode and scale a single sample.
pub fn encode_input(
    input: &FeatureInput<'_>,
    encoders: &CategoricalEncoders,
    scaler: &StandardScaler,
) -> Result<EncodedRow> {
    let mut defaulted = Vec::new();
    let crop = encode_category(&encoders.crop_type, input.crop_type, &mut defaulted)?;
    let stage = encode_category(&encoders.growth_stage, input.growth_stage, &mut defaulted)?;
    let location = encode_category(&encoders.location, input.location, &mut defaulted)?;

    let numeric = scaler.transform_row(&[
        input.days_planting,
        input.temperature,
        input.humidity,
        input.light,
    ])?;
    let &[days, temperature, humidity, light] = numeric.as_slice() else {
        return Err(ProcessingError::FeatureCountMismatch {
            expected: NUMERIC_COLUMNS.len(),
            actual: numeric.len(),
        });
    };

    let values = vec![crop, stage, days, location, temperature, humidity, light];
    debug_assert_eq!(values.len(), FEATURE_COLUMNS.len());

    Ok(EncodedRow { values, defaulted })
}

fn encode_category(
    encoder: &LabelEncoder,
    value: &str,
    defaulted: &mut Vec<DefaultedCategory>,
) -> Result<f64> {
    let encoded = encoder.encode(value)?;
    if let Encoded::Defaulted {
        value, fallback, ..
    } = &encoded
    {
        defaulted.push(DefaultedCategory {
            column: encoder.column().to_string(),
            value: value.clone(),
            fallback: fallback.clone(),
        });
    }
    Ok(encoded.index() as f64)
}
