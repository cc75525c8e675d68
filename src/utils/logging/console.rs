//! Console output utilities
//!
//! Summaries printed by the `inspect` command.

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::error::Result;

/// Print row count and column count of a table
pub fn print_batch_summary(batch: &RecordBatch) {
    println!(
        "Rows: {}, columns: {}",
        batch.num_rows(),
        batch.num_columns()
    );
}

/// Print column names, types and missing-value counts
pub fn print_schema_info(batch: &RecordBatch) {
    println!("Schema:");
    for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
        println!(
            "  - {} ({}), missing: {}",
            field.name(),
            field.data_type(),
            column.null_count()
        );
    }
}

/// Print the first `num_rows` rows as a table
///
/// # Arguments
/// * `batch` - Table to sample from
/// * `num_rows` - Maximum number of rows to print; fewer are printed for short tables
pub fn print_sample_rows(batch: &RecordBatch, num_rows: usize) -> Result<()> {
    let sample = batch.slice(0, num_rows.min(batch.num_rows()));
    println!("First {} rows:", sample.num_rows());
    println!("{}", pretty_format_batches(&[sample])?);
    Ok(())
}
