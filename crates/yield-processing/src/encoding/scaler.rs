//! Standardization of numeric columns.

use crate::error::{ProcessingError, Result};
use crate::utils::{float_values, mean_and_variance};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Per-column mean and variance captured at training time.
///
/// `transform` maps each value to `(x - mean) / sqrt(variance)`. A column
/// with zero variance is only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    columns: Vec<String>,
    means: Vec<f64>,
    variances: Vec<f64>,
}

impl StandardScaler {
    /// Fit on the named numeric columns of `df`, in the given order.
    pub fn fit(df: &DataFrame, columns: &[&str]) -> Result<Self> {
        let mut means = Vec::with_capacity(columns.len());
        let mut variances = Vec::with_capacity(columns.len());

        for column in columns {
            let values = float_values(df, column)?;
            let (mean, variance) = mean_and_variance(&values)
                .ok_or_else(|| ProcessingError::NoValidValues(column.to_string()))?;
            means.push(mean);
            variances.push(variance);
        }

        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            means,
            variances,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Check that every column has a finite mean and a non-negative variance.
    ///
    /// A scaler fitted here always passes; one read from disk may not.
    pub fn validate(&self) -> Result<()> {
        let n = self.columns.len();
        if self.means.len() != n || self.variances.len() != n {
            return Err(ProcessingError::InvalidState(format!(
                "scaler has {} columns but {} means and {} variances",
                n,
                self.means.len(),
                self.variances.len()
            )));
        }
        let bad = self
            .means
            .iter()
            .zip(&self.variances)
            .position(|(mean, variance)| {
                !mean.is_finite() || variance.is_nan() || *variance < 0.0
            });
        if let Some(index) = bad {
            return Err(ProcessingError::InvalidState(format!(
                "scaler statistics for '{}' are not usable",
                self.columns[index]
            )));
        }
        Ok(())
    }

    /// Standardize one value of the column at `index`.
    pub fn transform_value(&self, index: usize, value: f64) -> Result<f64> {
        let (mean, variance) = self
            .means
            .get(index)
            .zip(self.variances.get(index))
            .ok_or(ProcessingError::FeatureCountMismatch {
                expected: self.means.len().min(self.variances.len()),
                actual: index + 1,
            })?;
        let scale = match variance.sqrt() {
            s if s > 0.0 => s,
            _ => 1.0,
        };
        Ok((value - mean) / scale)
    }

    /// Standardize a row whose values follow [`Self::columns`] order.
    pub fn transform_row(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.len() != self.columns.len() {
            return Err(ProcessingError::FeatureCountMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        values
            .iter()
            .enumerate()
            .map(|(index, value)| self.transform_value(index, *value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        df!(
            "days_planting" => [10i64, 20, 30, 40],
            "temperature" => [20.0, 22.0, 24.0, 26.0],
            "flat" => [5.0, 5.0, 5.0, 5.0]
        )
        .unwrap()
    }

    #[test]
    fn test_fit_population_statistics() {
        let scaler = StandardScaler::fit(&sample(), &["days_planting", "temperature"]).unwrap();
        assert_eq!(scaler.means(), &[25.0, 23.0]);
        assert_eq!(scaler.variances(), &[125.0, 5.0]);
    }

    #[test]
    fn test_transformed_column_is_standard() {
        let df = sample();
        let scaler = StandardScaler::fit(&df, &["temperature"]).unwrap();
        let scaled: Vec<f64> = [20.0, 22.0, 24.0, 26.0]
            .iter()
            .map(|v| scaler.transform_value(0, *v).unwrap())
            .collect();
        let mean = scaled.iter().sum::<f64>() / 4.0;
        let var = scaled.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_column_is_centered() {
        let scaler = StandardScaler::fit(&sample(), &["flat"]).unwrap();
        assert_eq!(scaler.transform_value(0, 5.0).unwrap(), 0.0);
        assert_eq!(scaler.transform_value(0, 7.0).unwrap(), 2.0);
    }

    #[test]
    fn test_row_width_checked() {
        let scaler = StandardScaler::fit(&sample(), &["days_planting", "temperature"]).unwrap();
        let err = scaler.transform_row(&[1.0]).unwrap_err();
        assert_eq!(err.error_code(), "FEATURE_COUNT_MISMATCH");
    }

    #[test]
    fn test_missing_column_rejected() {
        let err = StandardScaler::fit(&sample(), &["humidity"]).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert!(err.to_string().contains("humidity"));
    }

    #[test]
    fn test_truncated_statistics_rejected() {
        let mut scaler =
            StandardScaler::fit(&sample(), &["days_planting", "temperature"]).unwrap();
        assert!(scaler.validate().is_ok());

        scaler.means.pop();
        scaler.variances.pop();
        assert_eq!(scaler.validate().unwrap_err().error_code(), "INVALID_STATE");
        assert_eq!(
            scaler.transform_row(&[10.0, 20.0]).unwrap_err().error_code(),
            "FEATURE_COUNT_MISMATCH"
        );
    }

    #[test]
    fn test_negative_variance_rejected() {
        let mut scaler = StandardScaler::fit(&sample(), &["temperature"]).unwrap();
        scaler.variances[0] = -1.0;
        let err = scaler.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }
}
