//! Column schemas for the raw and clean surveillance tables.

pub mod date_utils;
pub mod encoding;

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::error::{Error, Result};

pub use encoding::{
    AgeField, CategoricalField, CategoryLabel, CrossFieldRule, EncodingTable, IndicatorField,
    OutcomeField,
};

/// Arrow type used for labeled categories
#[must_use]
pub fn category_data_type() -> DataType {
    DataType::Dictionary(Box::new(DataType::Int8), Box::new(DataType::Utf8))
}

/// Fail with `Error::Schema` naming the first required column absent from `schema`
pub fn check_required_columns(schema: &Schema, encoding: &EncodingTable) -> Result<()> {
    match encoding
        .required_columns()
        .into_iter()
        .find(|column| schema.index_of(column).is_err())
    {
        Some(column) => Err(Error::schema(column)),
        None => Ok(()),
    }
}

/// Raw text dates keep their source encoding; the transformer parses them
#[must_use]
pub fn keep_dates_as_text(inferred: &Schema) -> SchemaRef {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| match f.data_type() {
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                Field::new(f.name(), DataType::Utf8, true)
            }
            _ => f.as_ref().clone(),
        })
        .collect();
    Arc::new(Schema::new(fields))
}

/// Schema for reading a persisted clean CSV artifact
///
/// Indicator and outcome columns are booleans; categorical columns are read
/// as text and re-encoded against the encoding table afterwards.
#[must_use]
pub fn clean_csv_schema(inferred: &Schema, encoding: &EncodingTable) -> SchemaRef {
    let boolean_columns: Vec<&str> = encoding
        .indicator_targets()
        .into_iter()
        .chain([encoding.outcome.target.as_str()])
        .collect();

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| {
            let name = f.name().as_str();
            if boolean_columns.contains(&name) {
                Field::new(name, DataType::Boolean, true)
            } else if encoding.categorical(name).is_some() {
                Field::new(name, DataType::Utf8, true)
            } else {
                Field::new(name, f.data_type().clone(), true)
            }
        })
        .collect();
    Arc::new(Schema::new(fields))
}
