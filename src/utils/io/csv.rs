//! CSV reading and writing for raw and clean tables

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Rows per batch while decoding; batches are concatenated afterwards
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Infer the schema of a headered CSV file from every row
pub fn infer_csv_schema(path: &Path) -> Result<SchemaRef> {
    let file = safe_open_file(path, "schema inference")?;
    let (schema, records) = Format::default()
        .with_header(true)
        .infer_schema(file, None)
        .map_err(|e| Error::parse(path, e))?;

    if schema.fields().is_empty() {
        return Err(Error::parse(path, "no header row"));
    }
    log::debug!(
        "Inferred {} columns from {records} records in {}",
        schema.fields().len(),
        path.display()
    );
    Ok(Arc::new(schema))
}

/// Read a headered CSV file with `schema` into a single batch
pub fn read_csv(path: &Path, schema: SchemaRef) -> Result<RecordBatch> {
    let start = std::time::Instant::now();
    log_operation_start("Reading CSV file", path);

    let mut file = safe_open_file(path, "reading CSV")?;
    file.rewind().map_err(|e| Error::io(path, e))?;

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)
        .map_err(|e| Error::parse(path, e))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::parse(path, e))?;
    let batch = concat_batches(&schema, &batches)?;

    log_operation_complete("read", path, batch.num_rows(), start.elapsed());
    Ok(batch)
}

/// Write `batch` as headered CSV into `file`
///
/// Booleans are written as `true`/`false`, missing values as empty fields.
pub fn write_csv(batch: &RecordBatch, file: &mut File) -> Result<()> {
    let mut writer = WriterBuilder::new().with_header(true).build(&mut *file);
    writer.write(batch)?;
    writer
        .into_inner()
        .flush()
        .map_err(|e| Error::Arrow(e.into()))?;
    Ok(())
}
