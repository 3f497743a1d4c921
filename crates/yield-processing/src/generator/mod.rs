//! Synthetic training data generation.
//!
//! Samples are drawn around each crop's optimal conditions and labeled with a
//! multiplicative yield model:
//!
//! ```text
//! yield = base_yield × temperature × humidity × light × growth × location × noise
//! ```
//!
//! where `noise` is uniform in `[0.85, 1.15)`. The generator is fully
//! deterministic for a given [`GeneratorConfig::seed`].
//!
//! # Example
//!
//! ```rust,ignore
//! use yield_processing::{GeneratorConfig, SyntheticGenerator};
//!
//! let mut generator = SyntheticGenerator::new(GeneratorConfig::default())?;
//! let df = generator.generate()?;
//! assert_eq!(df.height(), 2000);
//! ```

mod factors;

pub use factors::{growth_factor, humidity_factor, light_factor, location_factor, temperature_factor};

use crate::crops::{CROP_PROFILES, CropProfile, GROWTH_STAGES, LOCATIONS, OptimalRange};
use crate::error::{ProcessingError, Result};
use crate::types::{TrainingRecord, records_to_dataframe};
use crate::utils::round_to;
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Clipping bounds applied to every sampled temperature (°C).
pub const TEMPERATURE_BOUNDS: OptimalRange = OptimalRange::new(10.0, 35.0);
/// Clipping bounds applied to every sampled humidity (%).
pub const HUMIDITY_BOUNDS: OptimalRange = OptimalRange::new(30.0, 90.0);
/// Clipping bounds applied to every sampled light level.
pub const LIGHT_BOUNDS: OptimalRange = OptimalRange::new(200.0, 1500.0);

/// Inclusive range of days since planting.
pub const DAYS_PLANTING_RANGE: (i64, i64) = (1, 120);

/// Configuration for [`SyntheticGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of samples to draw. Default: 2000
    pub n_samples: usize,
    /// Seed for the random number generator. Default: 42
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_samples: 2000,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    pub fn new(n_samples: usize, seed: u64) -> Self {
        Self { n_samples, seed }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.n_samples == 0 {
            return Err(ProcessingError::InvalidConfig(
                "n_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Draws labeled samples from the agronomic yield model.
#[derive(Debug)]
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the configured number of samples as records.
    pub fn generate_records(&mut self) -> Vec<TrainingRecord> {
        let records: Vec<TrainingRecord> = (0..self.config.n_samples)
            .map(|_| self.sample_record())
            .collect();
        debug!(
            "Generated {} synthetic records (seed {})",
            records.len(),
            self.config.seed
        );
        records
    }

    /// Generate the configured number of samples as a [`DataFrame`].
    pub fn generate(&mut self) -> Result<DataFrame> {
        let records = self.generate_records();
        records_to_dataframe(&records)
    }

    fn sample_record(&mut self) -> TrainingRecord {
        let profile: &CropProfile = CROP_PROFILES
            .choose(&mut self.rng)
            .unwrap_or(&CROP_PROFILES[0]);

        let temperature = self.sample_around(&profile.temperature, &TEMPERATURE_BOUNDS);
        let humidity = self.sample_around(&profile.humidity, &HUMIDITY_BOUNDS);
        let light = self.sample_around(&profile.light, &LIGHT_BOUNDS);

        let days_planting = self
            .rng
            .gen_range(DAYS_PLANTING_RANGE.0..=DAYS_PLANTING_RANGE.1);
        let (growth_stage, _) = *GROWTH_STAGES
            .choose(&mut self.rng)
            .unwrap_or(&GROWTH_STAGES[0]);
        let (location, _) = *LOCATIONS.choose(&mut self.rng).unwrap_or(&LOCATIONS[0]);

        let noise = self.rng.gen_range(0.85..1.15);
        let expected = expected_yield(
            profile,
            temperature,
            humidity,
            light,
            growth_stage,
            days_planting,
            location,
        );

        // labels see the raw draw; only the stored record is rounded
        TrainingRecord {
            crop_type: profile.name.to_string(),
            growth_stage: growth_stage.to_string(),
            days_planting,
            location: location.to_string(),
            temperature: round_to(temperature, 1),
            humidity: round_to(humidity, 1),
            light: light.trunc(),
            yield_value: (expected * noise).trunc() as i64,
        }
    }

    /// Normal draw centered on the range midpoint with `σ = width / 4`,
    /// clipped to `bounds`.
    fn sample_around(&mut self, optimal: &OptimalRange, bounds: &OptimalRange) -> f64 {
        let value = sample_normal(&mut self.rng, optimal.midpoint(), optimal.width() / 4.0);
        value.clamp(bounds.min, bounds.max)
    }
}

/// Noise-free yield for one set of conditions, as drawn before rounding.
pub fn expected_yield(
    profile: &CropProfile,
    temperature: f64,
    humidity: f64,
    light: f64,
    growth_stage: &str,
    days_planting: i64,
    location: &str,
) -> f64 {
    profile.base_yield
        * temperature_factor(temperature, &profile.temperature)
        * humidity_factor(humidity, &profile.humidity)
        * light_factor(light, &profile.light)
        * growth_factor(growth_stage, days_planting)
        * location_factor(location)
}

/// Box-Muller transform on the supplied RNG.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // 1 - U keeps u1 in (0, 1] so ln never sees zero
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}
