//! Dataset column names and the training record type.

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const CROP_TYPE: &str = "crop_type";
pub const GROWTH_STAGE: &str = "growth_stage";
pub const DAYS_PLANTING: &str = "days_planting";
pub const LOCATION: &str = "location";
pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const LIGHT: &str = "light";
pub const YIELD: &str = "yield";

/// Model input columns, in the order the regressor sees them.
pub const FEATURE_COLUMNS: [&str; 7] = [
    CROP_TYPE,
    GROWTH_STAGE,
    DAYS_PLANTING,
    LOCATION,
    TEMPERATURE,
    HUMIDITY,
    LIGHT,
];

/// Columns that are label-encoded.
pub const CATEGORICAL_COLUMNS: [&str; 3] = [CROP_TYPE, GROWTH_STAGE, LOCATION];

/// Columns that are standardized.
pub const NUMERIC_COLUMNS: [&str; 4] = [DAYS_PLANTING, TEMPERATURE, HUMIDITY, LIGHT];

/// One labeled sample of the synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub crop_type: String,
    pub growth_stage: String,
    pub days_planting: i64,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
    #[serde(rename = "yield")]
    pub yield_value: i64,
}

/// Build a [`DataFrame`] with one row per record and the columns above.
pub fn records_to_dataframe(records: &[TrainingRecord]) -> Result<DataFrame> {
    let crop_types: Vec<&str> = records.iter().map(|r| r.crop_type.as_str()).collect();
    let growth_stages: Vec<&str> = records.iter().map(|r| r.growth_stage.as_str()).collect();
    let days: Vec<i64> = records.iter().map(|r| r.days_planting).collect();
    let locations: Vec<&str> = records.iter().map(|r| r.location.as_str()).collect();
    let temperatures: Vec<f64> = records.iter().map(|r| r.temperature).collect();
    let humidities: Vec<f64> = records.iter().map(|r| r.humidity).collect();
    let lights: Vec<f64> = records.iter().map(|r| r.light).collect();
    let yields: Vec<i64> = records.iter().map(|r| r.yield_value).collect();

    let df = df!(
        CROP_TYPE => crop_types,
        GROWTH_STAGE => growth_stages,
        DAYS_PLANTING => days,
        LOCATION => locations,
        TEMPERATURE => temperatures,
        HUMIDITY => humidities,
        LIGHT => lights,
        YIELD => yields
    )?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(crop: &str, yield_value: i64) -> TrainingRecord {
        TrainingRecord {
            crop_type: crop.to_string(),
            growth_stage: "fruiting".to_string(),
            days_planting: 95,
            location: "greenhouse".to_string(),
            temperature: 24.1,
            humidity: 64.8,
            light: 750.0,
            yield_value,
        }
    }

    #[test]
    fn test_records_to_dataframe_shape() {
        let df = records_to_dataframe(&[record("tomato", 51_000), record("pepper", 40_000)])
            .unwrap();
        assert_eq!(df.shape(), (2, 8));
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "crop_type",
                "growth_stage",
                "days_planting",
                "location",
                "temperature",
                "humidity",
                "light",
                "yield"
            ]
        );
    }

    #[test]
    fn test_record_serializes_yield_key() {
        let json = serde_json::to_value(record("lettuce", 12_345)).unwrap();
        assert_eq!(json["yield"], 12_345);
        assert!(json.get("yield_value").is_none());
    }
}
