//! Label encoding for categorical columns.

use crate::error::{ProcessingError, Result};
use crate::types::{CROP_TYPE, GROWTH_STAGE, LOCATION};
use crate::utils::string_values;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of encoding a single categorical value.
///
/// Unseen values are never silently swapped: callers can tell a degraded
/// input apart from a known one and surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// The value was seen during fitting.
    Known(usize),
    /// The value was unseen and was replaced by the first known class.
    Defaulted {
        value: String,
        fallback: String,
        index: usize,
    },
}

impl Encoded {
    pub fn index(&self) -> usize {
        match self {
            Encoded::Known(index) => *index,
            Encoded::Defaulted { index, .. } => *index,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Encoded::Defaulted { .. })
    }
}

/// Maps the distinct values of one column to dense integers.
///
/// Classes are kept sorted, so index `i` is the `i`-th value in lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the classes of `column` from a set of values.
    pub fn fit<I, S>(column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect();
        if classes.is_empty() {
            return Err(ProcessingError::NoValidValues(column.to_string()));
        }
        Ok(Self {
            column: column.to_string(),
            classes: classes.into_iter().collect(),
        })
    }

    /// Learn the classes of a string column of `df`.
    pub fn fit_column(df: &DataFrame, column: &str) -> Result<Self> {
        let values = string_values(df, column)?;
        Self::fit(column, values)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check that the classes are non-empty, sorted and unique, which
    /// [`Self::transform`] relies on.
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(ProcessingError::EmptyEncoder(self.column.clone()));
        }
        if !self.classes.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(ProcessingError::InvalidState(format!(
                "classes of '{}' are not sorted and unique",
                self.column
            )));
        }
        Ok(())
    }

    /// Index of a known value.
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }

    /// Encode a value, falling back to the first known class if unseen.
    pub fn encode(&self, value: &str) -> Result<Encoded> {
        if let Some(index) = self.transform(value) {
            return Ok(Encoded::Known(index));
        }
        let fallback = self
            .classes
            .first()
            .ok_or_else(|| ProcessingError::EmptyEncoder(self.column.clone()))?;
        Ok(Encoded::Defaulted {
            value: value.to_string(),
            fallback: fallback.clone(),
            index: 0,
        })
    }

    /// Class name for an index.
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

/// Fitted encoders for every categorical model input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalEncoders {
    pub crop_type: LabelEncoder,
    pub growth_stage: LabelEncoder,
    pub location: LabelEncoder,
}

impl CategoricalEncoders {
    /// Fit one encoder per categorical column of `df`.
    pub fn fit(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            crop_type: LabelEncoder::fit_column(df, CROP_TYPE)?,
            growth_stage: LabelEncoder::fit_column(df, GROWTH_STAGE)?,
            location: LabelEncoder::fit_column(df, LOCATION)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.crop_type.validate()?;
        self.growth_stage.validate()?;
        self.location.validate()
    }

    /// Encoder for a column name, if it is categorical.
    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        match column {
            CROP_TYPE => Some(&self.crop_type),
            GROWTH_STAGE => Some(&self.growth_stage),
            LOCATION => Some(&self.location),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use polars::prelude::*;

    #[test]
    fn test_classes_sorted_and_deduplicated() {
        let encoder =
            LabelEncoder::fit("crop_type", ["tomato", "lettuce", "tomato", "pepper"]).unwrap();
        assert_eq!(encoder.classes(), &["lettuce", "pepper", "tomato"]);
        assert_eq!(encoder.transform("pepper"), Some(1));
        assert_eq!(encoder.inverse_transform(2), Some("tomato"));
    }

    #[test]
    fn test_unknown_value_is_tagged() {
        let encoder = LabelEncoder::fit("location", ["lot-a", "greenhouse"]).unwrap();
        assert_eq!(encoder.encode("lot-a").unwrap(), Encoded::Known(1));

        let encoded = encoder.encode("rooftop").unwrap();
        assert!(encoded.is_defaulted());
        assert_eq!(encoded.index(), 0);
        assert_eq!(
            encoded,
            Encoded::Defaulted {
                value: "rooftop".to_string(),
                fallback: "greenhouse".to_string(),
                index: 0,
            }
        );
    }

    #[test]
    fn test_fit_empty_rejected() {
        let values: Vec<&str> = Vec::new();
        let err = LabelEncoder::fit("growth_stage", values).unwrap_err();
        assert_eq!(err.error_code(), "NO_VALID_VALUES");
    }

    #[test]
    fn test_empty_encoder_from_disk_errors() {
        let encoder: LabelEncoder =
            serde_json::from_str(r#"{"column":"location","classes":[]}"#).unwrap();
        assert_eq!(
            encoder.encode("lot-a").unwrap_err().error_code(),
            "EMPTY_ENCODER"
        );
    }

    #[test]
    fn test_unsorted_classes_from_disk_rejected() {
        let encoder: LabelEncoder = serde_json::from_str(
            r#"{"column":"crop_type","classes":["tomato","lettuce"]}"#,
        )
        .unwrap();
        assert_eq!(encoder.validate().unwrap_err().error_code(), "INVALID_STATE");

        let duplicated: LabelEncoder =
            serde_json::from_str(r#"{"column":"crop_type","classes":["pepper","pepper"]}"#)
                .unwrap();
        assert!(duplicated.validate().is_err());

        let fitted = LabelEncoder::fit("crop_type", ["tomato", "lettuce"]).unwrap();
        assert!(fitted.validate().is_ok());
    }

    #[test]
    fn test_fit_all_categorical_columns() {
        let df = df!(
            "crop_type" => ["tomato", "pepper"],
            "growth_stage" => ["early", "fruiting"],
            "location" => ["lot-a", "lot-b"]
        )
        .unwrap();
        let encoders = CategoricalEncoders::fit(&df).unwrap();
        assert_eq!(encoders.crop_type.classes(), &["pepper", "tomato"]);
        assert!(encoders.get("location").is_some());
        assert!(encoders.get("temperature").is_none());
    }
}
