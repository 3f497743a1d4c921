//! Integration tests for the yield-processing library.

use pretty_assertions::assert_eq;
use yield_processing::{
    FEATURE_COLUMNS, FeatureInput, GeneratorConfig, StandardScaler, SyntheticGenerator,
    build_feature_matrix, encode_input, fit_preprocessors, write_csv,
};
use yield_processing::utils::{float_values, string_values};

fn generate(n: usize, seed: u64) -> polars::prelude::DataFrame {
    SyntheticGenerator::new(GeneratorConfig::new(n, seed))
        .expect("valid config")
        .generate()
        .expect("generation succeeds")
}

#[test]
fn test_generated_dataset_columns() {
    let df = generate(100, 42);
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
            "yield",
        ]
    );
    assert_eq!(df.height(), 100);
}

#[test]
fn test_encoders_learn_all_categories() {
    let df = generate(2000, 42);
    let (encoders, scaler) = fit_preprocessors(&df).unwrap();

    assert_eq!(
        encoders.crop_type.classes(),
        &["lettuce", "pepper", "strawberry", "tomato"]
    );
    assert_eq!(
        encoders.growth_stage.classes(),
        &["early", "flowering", "fruiting", "vegetative"]
    );
    assert_eq!(
        encoders.location.classes(),
        &["greenhouse", "lot-a", "lot-b", "lot-c"]
    );
    assert_eq!(
        scaler.columns(),
        &["days_planting", "temperature", "humidity", "light"]
    );
}

#[test]
fn test_single_input_matches_matrix_row() {
    let df = generate(300, 9);
    let (encoders, scaler) = fit_preprocessors(&df).unwrap();
    let matrix = build_feature_matrix(&df, &encoders, &scaler).unwrap();
    assert_eq!(matrix.n_features(), FEATURE_COLUMNS.len());

    let crops = string_values(&df, "crop_type").unwrap();
    let stages = string_values(&df, "growth_stage").unwrap();
    let locations = string_values(&df, "location").unwrap();
    let days = float_values(&df, "days_planting").unwrap();
    let temperatures = float_values(&df, "temperature").unwrap();
    let humidities = float_values(&df, "humidity").unwrap();
    let lights = float_values(&df, "light").unwrap();

    let input = FeatureInput {
        crop_type: &crops[0],
        growth_stage: &stages[0],
        days_planting: days[0],
        location: &locations[0],
        temperature: temperatures[0],
        humidity: humidities[0],
        light: lights[0],
    };
    let row = encode_input(&input, &encoders, &scaler).unwrap();
    assert!(!row.is_degraded());
    assert_eq!(row.values, matrix.rows[0]);
}

#[test]
fn test_preprocessors_survive_json() {
    let df = generate(200, 5);
    let (encoders, scaler) = fit_preprocessors(&df).unwrap();

    let scaler_json = serde_json::to_string(&scaler).unwrap();
    let restored: StandardScaler = serde_json::from_str(&scaler_json).unwrap();
    assert_eq!(restored, scaler);

    let encoders_json = serde_json::to_string(&encoders).unwrap();
    let restored: yield_processing::CategoricalEncoders =
        serde_json::from_str(&encoders_json).unwrap();
    assert_eq!(restored, encoders);
}

#[test]
fn test_export_writes_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.csv");
    let mut df = generate(40, 42);

    write_csv(&mut df, &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 41);
    assert!(contents.starts_with("crop_type,"));
}
