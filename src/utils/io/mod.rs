//! IO utilities for persisting tables
//!
//! Writes are all-or-nothing: the table is written to a temporary file next
//! to the destination and renamed into place only after it is complete.

pub mod csv;
pub mod parquet;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::util::{ensure_dir, parent_dir};
use crate::error::{Error, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

pub use csv::{DEFAULT_BATCH_SIZE, infer_csv_schema, read_csv, write_csv};
pub use parquet::{read_parquet, write_parquet};

/// On-disk format of the clean artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    /// File extension without the leading dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }

    /// Format implied by the extension of `path`
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(Error::config(
                "output format",
                format!("unsupported format '{other}'"),
            )),
        }
    }
}

/// Persist `batch` at `path`, replacing any existing file
///
/// Parent directories are created as needed. On failure the destination is
/// left as it was and no temporary file remains.
pub fn save(batch: &RecordBatch, path: &Path, format: OutputFormat) -> Result<()> {
    let start = std::time::Instant::now();
    log_operation_start("Saving clean dataset to", path);

    let dir = parent_dir(path);
    ensure_dir(dir)?;

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    match format {
        OutputFormat::Csv => write_csv(batch, staged.as_file_mut())?,
        OutputFormat::Parquet => write_parquet(batch, staged.as_file_mut())?,
    }
    staged.flush().map_err(|e| Error::io(staged.path(), e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(staged.path(), e))?;

    staged.persist(path).map_err(|e| Error::io(path, e.error))?;

    log_operation_complete("wrote", path, batch.num_rows(), start.elapsed());
    Ok(())
}
