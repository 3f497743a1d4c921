//! Crop yield data processing library
//!
//! Dataset side of the crop yield predictor, built on Polars.
//!
//! # Overview
//!
//! - **Crop Profiles**: one shared table of base yields and optimal growing
//!   ranges ([`crops`])
//! - **Synthetic Data**: seeded generation of labeled samples around each
//!   crop's optimum ([`SyntheticGenerator`])
//! - **Encoding**: label encoding of categorical columns with explicit
//!   reporting of unseen values ([`LabelEncoder`], [`Encoded`])
//! - **Scaling**: standardization with statistics captured at fit time
//!   ([`StandardScaler`])
//! - **Feature Matrix**: model-ready rows in a fixed column order
//!   ([`build_feature_matrix`], [`encode_input`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use yield_processing::{GeneratorConfig, SyntheticGenerator};
//! use yield_processing::{build_feature_matrix, fit_preprocessors};
//!
//! let df = SyntheticGenerator::new(GeneratorConfig::default())?.generate()?;
//! let (encoders, scaler) = fit_preprocessors(&df)?;
//! let matrix = build_feature_matrix(&df, &encoders, &scaler)?;
//!
//! println!("{} rows x {} features", matrix.len(), matrix.n_features());
//! ```

pub mod crops;
pub mod encoding;
pub mod error;
pub mod export;
pub mod features;
pub mod generator;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use crops::{
    CROP_PROFILES, CropProfile, GROWTH_STAGES, LOCATIONS, OptimalRange, crop_profile,
    growth_stage_multiplier, location_multiplier,
};
pub use encoding::{CategoricalEncoders, Encoded, LabelEncoder, StandardScaler};
pub use error::{ProcessingError, Result as ProcessingResult};
pub use export::write_csv;
pub use features::{
    DefaultedCategory, EncodedRow, FeatureInput, FeatureMatrix, build_feature_matrix,
    encode_input, fit_preprocessors,
};
pub use generator::{GeneratorConfig, SyntheticGenerator};
pub use types::{
    CATEGORICAL_COLUMNS, FEATURE_COLUMNS, NUMERIC_COLUMNS, TrainingRecord, records_to_dataframe,
};

// Fitted preprocessors are shared read-only across threads by callers.
static_assertions::assert_impl_all!(CategoricalEncoders: Send, Sync);
static_assertions::assert_impl_all!(StandardScaler: Send, Sync);
