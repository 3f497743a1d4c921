//! Trained artifact persistence.
//!
//! A [`ModelBundle`] is written as three JSON files in one directory:
//!
//! | file | content |
//! |------|---------|
//! | `yield_model.json` | the [`RandomForest`] and the model version tag |
//! | `scaler.json` | the fitted [`StandardScaler`] |
//! | `encoders.json` | the fitted [`CategoricalEncoders`] |
//!
//! Each file carries the same [`ArtifactStamp`]. Loading refuses a set whose
//! stamps differ, so files from two training runs are never mixed.

use crate::error::{Result, YieldError};
use crate::forest::RandomForest;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use yield_processing::{CategoricalEncoders, FEATURE_COLUMNS, NUMERIC_COLUMNS, StandardScaler};

pub const MODEL_FILE: &str = "yield_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "encoders.json";

/// Version of the on-disk layout; bumped on incompatible changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Tag reported with every prediction.
pub const MODEL_VERSION: &str = "yield-forest-v1.0";

/// Identity of one training run, shared by all files it wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStamp {
    pub format_version: u32,
    pub run_id: String,
    pub created_at: DateTime<Utc>,
}

impl ArtifactStamp {
    /// A fresh stamp for a new training run.
    pub fn new() -> Self {
        let created_at = Utc::now();
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            run_id: format!(
                "{}-{:08x}",
                created_at.format("%Y%m%dT%H%M%SZ"),
                rand::random::<u32>()
            ),
            created_at,
        }
    }
}

impl Default for ArtifactStamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Locations of the three artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoders: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            encoders: dir.join(ENCODERS_FILE),
        }
    }

    fn all(&self) -> [&Path; 3] {
        [&self.model, &self.scaler, &self.encoders]
    }

    /// Whether every file is present.
    pub fn exist(&self) -> bool {
        self.all().iter().all(|path| path.exists())
    }
}

#[derive(Serialize, Deserialize)]
struct ModelFile {
    stamp: ArtifactStamp,
    model_version: String,
    forest: RandomForest,
}

#[derive(Serialize, Deserialize)]
struct ScalerFile {
    stamp: ArtifactStamp,
    scaler: StandardScaler,
}

#[derive(Serialize, Deserialize)]
struct EncodersFile {
    stamp: ArtifactStamp,
    encoders: CategoricalEncoders,
}

/// The fitted forest together with the preprocessors it was trained with.
///
/// Immutable once built; prediction borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub stamp: ArtifactStamp,
    pub model_version: String,
    pub forest: RandomForest,
    pub encoders: CategoricalEncoders,
    pub scaler: StandardScaler,
}

impl ModelBundle {
    pub fn new(
        forest: RandomForest,
        encoders: CategoricalEncoders,
        scaler: StandardScaler,
    ) -> Self {
        Self {
            stamp: ArtifactStamp::new(),
            model_version: MODEL_VERSION.to_string(),
            forest,
            encoders,
            scaler,
        }
    }

    /// Write the three artifact files into `dir`, creating it if needed.
    ///
    /// Existing files are overwritten.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<ArtifactPaths> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| YieldError::Artifact {
            path: dir.to_path_buf(),
            source,
        })?;
        let paths = ArtifactPaths::in_dir(dir);

        write_json(
            &paths.model,
            &ModelFile {
                stamp: self.stamp.clone(),
                model_version: self.model_version.clone(),
                forest: self.forest.clone(),
            },
        )?;
        write_json(
            &paths.scaler,
            &ScalerFile {
                stamp: self.stamp.clone(),
                scaler: self.scaler.clone(),
            },
        )?;
        write_json(
            &paths.encoders,
            &EncodersFile {
                stamp: self.stamp.clone(),
                encoders: self.encoders.clone(),
            },
        )?;

        info!("Saved model artifact {} to {}", self.stamp.run_id, dir.display());
        Ok(paths)
    }

    /// Load and cross-check the artifact files in `dir`.
    ///
    /// # Errors
    ///
    /// - [`YieldError::ModelNotTrained`] if any of the files is missing
    /// - [`YieldError::InconsistentArtifact`] if the stamps disagree, a file
    ///   does not parse, or the content does not fit the feature layout
    /// - [`YieldError::Artifact`] if a file cannot be read
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let paths = ArtifactPaths::in_dir(dir);
        let missing: Vec<&Path> = paths.all().into_iter().filter(|p| !p.exists()).collect();
        if !missing.is_empty() {
            if missing.len() < 3 {
                warn!(
                    "Incomplete model artifact, missing {}",
                    missing
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            return Err(YieldError::ModelNotTrained);
        }

        let model: ModelFile = read_json(&paths.model)?;
        let scaler: ScalerFile = read_json(&paths.scaler)?;
        let encoders: EncodersFile = read_json(&paths.encoders)?;

        if model.stamp.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(YieldError::InconsistentArtifact(format!(
                "format version {} is not supported (expected {})",
                model.stamp.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        for (name, stamp) in [(SCALER_FILE, &scaler.stamp), (ENCODERS_FILE, &encoders.stamp)] {
            if *stamp != model.stamp {
                return Err(YieldError::InconsistentArtifact(format!(
                    "{} belongs to run {} but {} belongs to run {}",
                    name, stamp.run_id, MODEL_FILE, model.stamp.run_id
                )));
            }
        }

        let bundle = Self {
            stamp: model.stamp,
            model_version: model.model_version,
            forest: model.forest,
            encoders: encoders.encoders,
            scaler: scaler.scaler,
        };
        bundle.validate()?;

        debug!("Loaded model artifact {}", bundle.stamp.run_id);
        Ok(bundle)
    }

    fn validate(&self) -> Result<()> {
        self.forest.validate()?;
        if self.forest.n_features() != FEATURE_COLUMNS.len() {
            return Err(YieldError::InconsistentArtifact(format!(
                "forest expects {} features, the feature layout has {}",
                self.forest.n_features(),
                FEATURE_COLUMNS.len()
            )));
        }
        self.scaler
            .validate()
            .map_err(|e| YieldError::InconsistentArtifact(format!("{SCALER_FILE}: {e}")))?;
        self.encoders
            .validate()
            .map_err(|e| YieldError::InconsistentArtifact(format!("{ENCODERS_FILE}: {e}")))?;
        if self.scaler.columns() != NUMERIC_COLUMNS.as_slice() {
            return Err(YieldError::InconsistentArtifact(format!(
                "scaler columns {:?} do not match {:?}",
                self.scaler.columns(),
                NUMERIC_COLUMNS
            )));
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes).map_err(|source| YieldError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|source| YieldError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| YieldError::InconsistentArtifact(format!("{}: {}", path.display(), e)))
}
