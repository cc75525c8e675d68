//! Column-level helpers shared by the transformation steps
//!
//! Every helper borrows its input batch and returns a new one.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, DictionaryArray, Int8Array, Int64Array, StringArray,
};
use arrow::compute::kernels::{boolean, cast};
use arrow::compute::{filter_record_batch, is_not_null};
use arrow::datatypes::{DataType, Field, Int8Type, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::schema::{CategoricalField, category_data_type};

/// Index of `column` in `batch`, or `Error::Schema`
pub fn column_index(batch: &RecordBatch, column: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column)
        .map_err(|_| Error::schema(column))
}

/// Read `column` as `Int64`, turning values that cannot be cast into nulls
pub fn column_as_i64(batch: &RecordBatch, column: &str) -> Result<Int64Array> {
    let idx = column_index(batch, column)?;
    let casted = cast::cast(batch.column(idx), &DataType::Int64)?;
    Ok(casted.as_primitive::<arrow::datatypes::Int64Type>().clone())
}

/// Read `column` as text, casting non-string columns
pub fn column_as_text(batch: &RecordBatch, column: &str) -> Result<StringArray> {
    let idx = column_index(batch, column)?;
    let casted = cast::cast(batch.column(idx), &DataType::Utf8)?;
    Ok(casted.as_string::<i32>().clone())
}

/// Read `column` as a boolean array
pub fn column_as_bool(batch: &RecordBatch, column: &str) -> Result<BooleanArray> {
    let idx = column_index(batch, column)?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<BooleanArray>()
        .cloned()
        .ok_or_else(|| {
            Error::Arrow(arrow::error::ArrowError::InvalidArgumentError(format!(
                "Column '{column}' is not a boolean array"
            )))
        })
}

/// Replace the column at `column` with `array`, renaming it to `new_name`
pub fn replace_column(
    batch: &RecordBatch,
    column: &str,
    new_name: &str,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    let schema = batch.schema();

    let mut fields = schema.fields().to_vec();
    fields[idx] = Arc::new(Field::new(new_name, array.data_type().clone(), true));
    let new_schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));

    let mut columns = batch.columns().to_vec();
    columns[idx] = array;

    Ok(RecordBatch::try_new(new_schema, columns)?)
}

/// Drop `column` and append `array` as `new_name` at the end of the schema
pub fn drop_and_append(
    batch: &RecordBatch,
    column: &str,
    new_name: &str,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    let schema = batch.schema();

    let mut fields = schema.fields().to_vec();
    fields.remove(idx);
    fields.push(Arc::new(Field::new(new_name, array.data_type().clone(), true)));
    let new_schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));

    let mut columns = batch.columns().to_vec();
    columns.remove(idx);
    columns.push(array);

    Ok(RecordBatch::try_new(new_schema, columns)?)
}

/// Map raw codes onto the dictionary keys of a categorical field
///
/// Codes without a label become null. The dictionary always holds the full
/// label set, so the value domain stays bounded even when a label is unused.
#[must_use]
pub fn encode_codes(codes: &Int64Array, field: &CategoricalField) -> DictionaryArray<Int8Type> {
    let keys: Int8Array = codes
        .iter()
        .map(|code| {
            code.and_then(|c| field.key_for_code(c))
                .and_then(|k| i8::try_from(k).ok())
        })
        .collect();
    dictionary_from_keys(keys, field)
}

/// Map text labels onto the dictionary keys of a categorical field
#[must_use]
pub fn encode_labels(labels: &StringArray, field: &CategoricalField) -> DictionaryArray<Int8Type> {
    let keys: Int8Array = labels
        .iter()
        .map(|label| {
            label
                .and_then(|l| field.key_for_label(l))
                .and_then(|k| i8::try_from(k).ok())
        })
        .collect();
    dictionary_from_keys(keys, field)
}

fn dictionary_from_keys(keys: Int8Array, field: &CategoricalField) -> DictionaryArray<Int8Type> {
    let values: ArrayRef = Arc::new(StringArray::from(field.label_values()));
    // Keys come from positions inside `values`, so they are always in bounds
    DictionaryArray::new(keys, values)
}

/// Per-row flags: does `column` hold the categorical `label`
///
/// Accepts both dictionary-encoded and plain text columns.
pub fn label_mask(batch: &RecordBatch, column: &str, label: &str) -> Result<Vec<bool>> {
    let idx = column_index(batch, column)?;
    let array = batch.column(idx);

    if let DataType::Dictionary(_, _) = array.data_type() {
        let casted = cast::cast(array, &category_data_type())?;
        let dictionary = casted.as_dictionary::<Int8Type>();
        let values = dictionary.values().as_string::<i32>();
        let target_keys: Vec<i8> = (0..values.len())
            .filter(|&i| values.is_valid(i) && values.value(i) == label)
            .filter_map(|i| i8::try_from(i).ok())
            .collect();
        return Ok(dictionary
            .keys()
            .iter()
            .map(|key| key.is_some_and(|k| target_keys.contains(&k)))
            .collect());
    }

    let text = column_as_text(batch, column)?;
    Ok(text.iter().map(|v| v == Some(label)).collect())
}

/// Overwrite `column` with `false` wherever `mask` is set
pub fn force_false(batch: &RecordBatch, column: &str, mask: &[bool]) -> Result<RecordBatch> {
    let values = column_as_bool(batch, column)?;
    let corrected: BooleanArray = values
        .iter()
        .zip(mask)
        .map(|(value, &hit)| if hit { Some(false) } else { value })
        .collect();
    replace_column(batch, column, column, Arc::new(corrected))
}

/// Filter out records with missing values in specific columns
pub fn filter_out_missing_values(
    batch: &RecordBatch,
    required_columns: &[&str],
) -> Result<RecordBatch> {
    // Start with a mask where all rows are included
    let mut mask = BooleanArray::from(vec![true; batch.num_rows()]);

    for &column_name in required_columns {
        let idx = column_index(batch, column_name)?;
        let is_valid = is_not_null(batch.column(idx))?;
        mask = boolean::and(&mask, &is_valid)?;
    }

    Ok(filter_record_batch(batch, &mask)?)
}
