//! Dataset export.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `df` as a CSV file with a header row.
///
/// Parent directories are created if they do not exist.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|source| ProcessingError::Export {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(path.to_path_buf())
}
