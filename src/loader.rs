//! Loading of the raw and clean surveillance tables

use std::path::Path;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;

use crate::acquire::DatasetAcquirer;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::schema::{EncodingTable, clean_csv_schema, keep_dates_as_text};
use crate::transform::columns::{column_as_text, encode_labels, replace_column};
use crate::utils::io::{OutputFormat, infer_csv_schema, read_csv, read_parquet};

/// Read a raw CSV table with its source column names and encodings intact
///
/// Numeric codes are read as integers; date-like columns stay text.
pub fn read_raw_csv(path: &Path) -> Result<RecordBatch> {
    let inferred = infer_csv_schema(path)?;
    read_csv(path, keep_dates_as_text(&inferred))
}

/// Ensure the raw dataset is present, then read it
///
/// Fails with `Error::Acquisition` if the download fails, `Error::NotFound`
/// if the raw file is absent afterwards and `Error::Parse` if it is not a
/// table.
pub fn load(config: &PipelineConfig, acquirer: &dyn DatasetAcquirer) -> Result<RecordBatch> {
    let dataset_dir = config.dataset_dir();
    acquirer.ensure_downloaded(&config.dataset_repo, &dataset_dir)?;

    let path = config.raw_file_path();
    if !path.is_file() {
        return Err(Error::not_found(&path));
    }
    read_raw_csv(&path)
}

/// Read a previously persisted clean artifact back with clean types
///
/// Indicator and outcome columns come back as booleans and categorical
/// columns as dictionaries over the full label set. The pipeline is not run.
pub fn load_clean(config: &PipelineConfig) -> Result<RecordBatch> {
    let path = config.clean_file_path();
    read_clean(&path, &config.encoding)
}

/// Read a clean artifact at `path`; the format follows the extension
pub fn read_clean(path: &Path, encoding: &EncodingTable) -> Result<RecordBatch> {
    if !path.is_file() {
        return Err(Error::not_found(path));
    }
    let batch = match OutputFormat::from_path(path).unwrap_or_default() {
        OutputFormat::Parquet => read_parquet(path)?,
        OutputFormat::Csv => {
            let inferred = infer_csv_schema(path)?;
            read_csv(path, clean_csv_schema(&inferred, encoding))?
        }
    };
    restore_categories(&batch, encoding)
}

/// Re-encode categorical columns against the encoding table
fn restore_categories(batch: &RecordBatch, encoding: &EncodingTable) -> Result<RecordBatch> {
    let mut current = batch.clone();
    for field in &encoding.categoricals {
        if current.schema().index_of(&field.target).is_err() {
            continue;
        }
        let labels = column_as_text(&current, &field.target)?;
        let encoded: ArrayRef = Arc::new(encode_labels(&labels, field));
        current = replace_column(&current, &field.target, &field.target, encoded)?;
    }
    Ok(current)
}
