//! Test helper functions
//!
//! Column extractors that turn Arrow arrays into plain vectors for assertions.

use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;

fn column<'a>(batch: &'a RecordBatch, name: &str) -> &'a dyn Array {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("column '{name}' not in batch"))
        .as_ref()
}

/// Values of a boolean column
#[must_use]
pub fn bool_values(batch: &RecordBatch, name: &str) -> Vec<Option<bool>> {
    column(batch, name).as_boolean().iter().collect()
}

/// Values of an `Int64` column
#[must_use]
pub fn i64_values(batch: &RecordBatch, name: &str) -> Vec<Option<i64>> {
    column(batch, name)
        .as_primitive::<Int64Type>()
        .iter()
        .collect()
}

/// Values of a `Float64` column
#[must_use]
pub fn f64_values(batch: &RecordBatch, name: &str) -> Vec<Option<f64>> {
    column(batch, name)
        .as_primitive::<Float64Type>()
        .iter()
        .collect()
}

/// Labels of a dictionary or text column
#[must_use]
pub fn label_values(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let text = cast::cast(column(batch, name), &DataType::Utf8).expect("castable to text");
    text.as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Column names of `batch` in schema order
#[must_use]
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture directory");
    }
    std::fs::write(path, contents).expect("write fixture file");
}
