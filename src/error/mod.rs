//! Error handling for the cleaning pipeline.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Specialized error type for the cleaning pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Remote fetch or archive extraction failed
    #[error("Acquisition of '{repo}' into {} failed: {message}", .destination.display())]
    Acquisition {
        repo: String,
        destination: PathBuf,
        message: String,
    },
    /// An expected file is absent
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },
    /// A file exists but cannot be read as a table
    #[error("Failed to parse {} as a table: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    /// An expected column is absent from the input table
    #[error("Schema error: expected column '{column}' is missing")]
    Schema { column: String },
    /// Invalid configuration value or file
    #[error("Configuration error ({context}): {message}")]
    Config { context: String, message: String },
    /// Filesystem failure at a known path
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Arrow compute or construction failure
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Parquet encoding or decoding failure
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

impl Error {
    pub fn acquisition(repo: &str, destination: &Path, message: impl Into<String>) -> Self {
        Self::Acquisition {
            repo: repo.to_string(),
            destination: destination.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn not_found(path: &Path) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn parse(path: &Path, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn schema(column: &str) -> Self {
        Self::Schema {
            column: column.to_string(),
        }
    }

    pub fn config(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short label used when reporting the failure at the process boundary
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Acquisition { .. } => "acquisition",
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "parse",
            Self::Schema { .. } => "schema",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Arrow(_) => "arrow",
            Self::Parquet(_) => "parquet",
        }
    }

    /// Whether retrying (or placing the file manually) can resolve the failure
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Acquisition { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
