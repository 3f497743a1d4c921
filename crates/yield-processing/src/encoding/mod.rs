//! Categorical encoding and numeric standardization.
//!
//! Both transforms are fit once on the training dataset and persisted with
//! the model so that prediction uses exactly the same mapping.

mod label;
mod scaler;

pub use label::{CategoricalEncoders, Encoded, LabelEncoder};
pub use scaler::StandardScaler;
