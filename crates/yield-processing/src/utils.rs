//! Column extraction helpers shared by the encoders, the scaler and the
//! feature matrix builder.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;

// =============================================================================
// Column Access
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|column| column.as_materialized_series())
        .map_err(|_| ProcessingError::ColumnNotFound(name.to_string()))
}

/// Read a string column. Nulls are rejected.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = series(df, name)?;
    let values = series.str()?;
    values
        .into_iter()
        .map(|value| {
            value
                .map(str::to_string)
                .ok_or_else(|| ProcessingError::NoValidValues(name.to_string()))
        })
        .collect()
}

/// Read any numeric column as `f64`. Nulls are rejected.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = series(df, name)?;
    if !is_numeric_dtype(series.dtype()) {
        return Err(ProcessingError::InvalidConfig(format!(
            "column '{}' has non-numeric type {:?}",
            name,
            series.dtype()
        )));
    }
    let casted = series.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    values
        .into_iter()
        .map(|value| value.ok_or_else(|| ProcessingError::NoValidValues(name.to_string())))
        .collect()
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Population mean and variance (`ddof = 0`) of a slice.
///
/// Returns `None` for an empty slice.
pub fn mean_and_variance(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance))
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_values_casts_integers() {
        let df = df!("days" => [1i64, 2, 3]).unwrap();
        assert_eq!(float_values(&df, "days").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_column() {
        let df = df!("days" => [1i64]).unwrap();
        let err = string_values(&df, "crop_type").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_float_values_rejects_strings() {
        let df = df!("crop" => ["tomato"]).unwrap();
        assert!(float_values(&df, "crop").is_err());
    }

    #[test]
    fn test_mean_and_variance() {
        let (mean, variance) = mean_and_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(variance, 4.0);
        assert!(mean_and_variance(&[]).is_none());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(24.36, 1), 24.4);
        assert_eq!(round_to(99.94, 1), 99.9);
    }
}
