//! Configuration for the cleaning pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::schema::EncodingTable;
use crate::transform::TransformOptions;
use crate::utils::io::OutputFormat;

/// Kaggle repository holding the surveillance dataset
pub const DEFAULT_DATASET_REPO: &str = "meirnizri/covid19-dataset";
/// Folder below the raw data root holding the extracted dataset
pub const DEFAULT_DATASET_FOLDER: &str = "covid19-dataset";
/// File name of the raw table inside the dataset folder
pub const DEFAULT_RAW_FILENAME: &str = "Covid Data.csv";
/// Root directory for downloaded raw data
pub const DEFAULT_RAW_DATA_ROOT: &str = "data/raw";
/// Root directory for intermediate artifacts
pub const DEFAULT_INTERIM_DATA_ROOT: &str = "data/interim";
/// Stem of the clean artifact file name
pub const CLEAN_FILE_STEM: &str = "covid-data-clean";

fn default_raw_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_RAW_DATA_ROOT)
}

fn default_interim_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_INTERIM_DATA_ROOT)
}

fn default_dataset_repo() -> String {
    DEFAULT_DATASET_REPO.to_string()
}

fn default_dataset_folder() -> Option<String> {
    Some(DEFAULT_DATASET_FOLDER.to_string())
}

fn default_raw_filename() -> String {
    DEFAULT_RAW_FILENAME.to_string()
}

/// Configuration for one pipeline run
///
/// `drop_missing_rows` has no default, neither here nor in a configuration
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding downloaded datasets
    #[serde(default = "default_raw_data_root")]
    pub raw_data_root: PathBuf,
    /// Directory receiving the clean artifact
    #[serde(default = "default_interim_data_root")]
    pub interim_data_root: PathBuf,
    /// `owner/slug` identifier of the remote dataset
    #[serde(default = "default_dataset_repo")]
    pub dataset_repo: String,
    /// Folder under `raw_data_root`; derived from the repo when `None`
    #[serde(default = "default_dataset_folder")]
    pub dataset_folder: Option<String>,
    /// File name of the raw table inside the dataset folder
    #[serde(default = "default_raw_filename")]
    pub raw_filename: String,
    /// Drop rows that still hold a missing indicator after cleaning
    pub drop_missing_rows: bool,
    /// Rescale age to `[0, 1]`
    #[serde(default)]
    pub rescale_age: bool,
    /// Format of the clean artifact
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Decoding rules for the raw columns
    #[serde(default)]
    pub encoding: EncodingTable,
}

impl PipelineConfig {
    /// Configuration with default locations and the canonical encoding
    #[must_use]
    pub fn new(drop_missing_rows: bool, rescale_age: bool) -> Self {
        Self {
            raw_data_root: default_raw_data_root(),
            interim_data_root: default_interim_data_root(),
            dataset_repo: default_dataset_repo(),
            dataset_folder: default_dataset_folder(),
            raw_filename: default_raw_filename(),
            drop_missing_rows,
            rescale_age,
            output_format: OutputFormat::default(),
            encoding: EncodingTable::v2(),
        }
    }

    /// Load a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "pipeline configuration")?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| Error::config(path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let mut parts = self.dataset_repo.split('/');
        let valid_repo = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(slug), None) if !owner.is_empty() && !slug.is_empty()
        );
        if !valid_repo {
            return Err(Error::config(
                "dataset_repo",
                format!("expected 'owner/dataset', got '{}'", self.dataset_repo),
            ));
        }
        if self.raw_filename.trim().is_empty() {
            return Err(Error::config("raw_filename", "must not be empty"));
        }
        self.encoding.validate()
    }

    /// Folder name of the dataset below `raw_data_root`
    #[must_use]
    pub fn dataset_folder_name(&self) -> String {
        self.dataset_folder
            .clone()
            .unwrap_or_else(|| self.dataset_repo.replace('/', "_"))
    }

    /// `<raw_data_root>/<dataset_folder>`
    #[must_use]
    pub fn dataset_dir(&self) -> PathBuf {
        self.raw_data_root.join(self.dataset_folder_name())
    }

    /// `<raw_data_root>/<dataset_folder>/<raw_filename>`
    #[must_use]
    pub fn raw_file_path(&self) -> PathBuf {
        self.dataset_dir().join(&self.raw_filename)
    }

    /// `<interim_data_root>/covid-data-clean.<ext>`
    #[must_use]
    pub fn clean_file_path(&self) -> PathBuf {
        self.interim_data_root.join(format!(
            "{CLEAN_FILE_STEM}.{}",
            self.output_format.extension()
        ))
    }

    #[must_use]
    pub const fn transform_options(&self) -> TransformOptions {
        TransformOptions::new(self.drop_missing_rows, self.rescale_age)
    }
}
