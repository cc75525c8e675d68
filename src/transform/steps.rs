//! Named transformation steps, applied in order by the [`Transformer`].
//!
//! [`Transformer`]: super::Transformer

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::error::Result;
use crate::schema::EncodingTable;
use crate::schema::date_utils::parse_date_cell;
use crate::schema::encoding::{NO_CODE, YES_CODE};
use crate::transform::columns::{
    column_as_i64, column_as_text, drop_and_append, encode_codes, filter_out_missing_values,
    force_false, label_mask, replace_column,
};

/// A pure batch-to-batch transformation
pub trait TransformStep: Send + Sync {
    /// Stable name used in logs
    fn name(&self) -> &'static str;

    /// Produce a new batch from `batch`
    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch>;
}

/// Decode a single indicator code into a tri-state boolean
#[must_use]
pub const fn decode_indicator(code: Option<i64>) -> Option<bool> {
    match code {
        Some(YES_CODE) => Some(true),
        Some(NO_CODE) => Some(false),
        _ => None,
    }
}

/// Step 1: `1 -> true`, `2 -> false`, everything else -> missing
pub struct NormalizeIndicators {
    encoding: Arc<EncodingTable>,
}

impl NormalizeIndicators {
    #[must_use]
    pub const fn new(encoding: Arc<EncodingTable>) -> Self {
        Self { encoding }
    }
}

impl TransformStep for NormalizeIndicators {
    fn name(&self) -> &'static str {
        "normalize_indicators"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut current = batch.clone();
        for field in &self.encoding.indicators {
            let codes = column_as_i64(&current, &field.source)?;

            let (sentinels, out_of_domain) = codes.iter().fold((0usize, 0usize), |acc, code| {
                match code {
                    Some(YES_CODE | NO_CODE) => acc,
                    Some(c) if self.encoding.is_sentinel(c) => (acc.0 + 1, acc.1),
                    _ => (acc.0, acc.1 + 1),
                }
            });
            if out_of_domain > 0 {
                log::debug!(
                    "{}: {out_of_domain} values outside the declared domain set to missing",
                    field.source
                );
            }
            log::trace!("{}: {sentinels} sentinel codes set to missing", field.source);

            let decoded: BooleanArray = codes.iter().map(decode_indicator).collect();
            current = replace_column(&current, &field.source, &field.target, Arc::new(decoded))?;
        }
        Ok(current)
    }
}

/// Step 2: categorical codes become labeled dictionary columns
pub struct RelabelCategories {
    encoding: Arc<EncodingTable>,
}

impl RelabelCategories {
    #[must_use]
    pub const fn new(encoding: Arc<EncodingTable>) -> Self {
        Self { encoding }
    }
}

impl TransformStep for RelabelCategories {
    fn name(&self) -> &'static str {
        "relabel_categories"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut current = batch.clone();
        for field in &self.encoding.categoricals {
            let codes = column_as_i64(&current, &field.source)?;
            let labeled: ArrayRef = Arc::new(encode_codes(&codes, field));

            let unmapped = labeled.null_count() - codes.null_count();
            if unmapped > 0 {
                log::debug!("{}: {unmapped} unmapped codes set to missing", field.source);
            }

            current = replace_column(&current, &field.source, &field.target, labeled)?;
        }
        Ok(current)
    }
}

/// Step 3: the date-or-sentinel column collapses into a boolean outcome
pub struct DeriveOutcome {
    encoding: Arc<EncodingTable>,
}

impl DeriveOutcome {
    #[must_use]
    pub const fn new(encoding: Arc<EncodingTable>) -> Self {
        Self { encoding }
    }
}

impl TransformStep for DeriveOutcome {
    fn name(&self) -> &'static str {
        "derive_outcome"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let field = &self.encoding.outcome;
        let raw = column_as_text(batch, &field.source)?;

        let outcome: BooleanArray = raw
            .iter()
            .map(|cell| {
                cell.and_then(|s| {
                    parse_date_cell(s, &field.sentinel, &field.date_formats).occurred()
                })
            })
            .collect();

        let invalid = outcome.null_count() - raw.null_count();
        if invalid > 0 {
            log::warn!(
                "{}: {invalid} values are neither a date nor '{}', outcome set to missing",
                field.source,
                field.sentinel
            );
        }

        drop_and_append(batch, &field.source, &field.target, Arc::new(outcome))
    }
}

/// Step 4: age validation and optional min-max rescaling
pub struct PrepareAge {
    encoding: Arc<EncodingTable>,
    rescale: bool,
}

impl PrepareAge {
    #[must_use]
    pub const fn new(encoding: Arc<EncodingTable>, rescale: bool) -> Self {
        Self { encoding, rescale }
    }
}

/// Min-max rescale to `[0, 1]` using the observed range of `ages`
///
/// The result is relative to this array only. A constant column maps to
/// `0.0`; nulls stay null.
#[must_use]
pub fn min_max_rescale(ages: &Int64Array) -> Float64Array {
    let Some((min, max)) = ages.iter().flatten().minmax().into_option() else {
        return ages.iter().map(|_| None::<f64>).collect();
    };

    #[allow(clippy::cast_precision_loss)]
    let span = (max - min) as f64;
    ages.iter()
        .map(|age| {
            age.map(|a| {
                if span == 0.0 {
                    0.0
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let offset = (a - min) as f64;
                    offset / span
                }
            })
        })
        .collect()
}

impl TransformStep for PrepareAge {
    fn name(&self) -> &'static str {
        "prepare_age"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let field = &self.encoding.age;
        let raw = column_as_i64(batch, &field.source)?;

        let ages: Int64Array = raw.iter().map(|age| age.filter(|a| *a >= 0)).collect();
        let rejected = ages.null_count() - raw.null_count();
        if rejected > 0 {
            log::debug!("{}: {rejected} negative ages set to missing", field.source);
        }

        let column: ArrayRef = if self.rescale {
            Arc::new(min_max_rescale(&ages))
        } else {
            Arc::new(ages)
        };
        replace_column(batch, &field.source, &field.target, column)
    }
}

/// Step 5: data-correction rules overwrite contradicting indicators
pub struct ApplyCrossFieldRules {
    encoding: Arc<EncodingTable>,
}

impl ApplyCrossFieldRules {
    #[must_use]
    pub const fn new(encoding: Arc<EncodingTable>) -> Self {
        Self { encoding }
    }
}

impl TransformStep for ApplyCrossFieldRules {
    fn name(&self) -> &'static str {
        "apply_cross_field_rules"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut current = batch.clone();
        for rule in &self.encoding.rules {
            let mask = label_mask(&current, &rule.column, &rule.label)?;
            let hits = mask.iter().filter(|&&m| m).count();
            log::debug!("{}: {hits} rows where {} = {}", rule.name, rule.column, rule.label);

            for column in &rule.force_false {
                current = force_false(&current, column, &mask)?;
            }
        }
        Ok(current)
    }
}

/// Step 6: drop every row with a missing indicator
pub struct DropMissingIndicators {
    encoding: Arc<EncodingTable>,
}

impl DropMissingIndicators {
    #[must_use]
    pub const fn new(encoding: Arc<EncodingTable>) -> Self {
        Self { encoding }
    }
}

impl TransformStep for DropMissingIndicators {
    fn name(&self) -> &'static str {
        "drop_missing_indicators"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let targets = self.encoding.indicator_targets();
        let filtered = filter_out_missing_values(batch, &targets)?;
        log::info!(
            "Dropped {} of {} rows with missing indicator values",
            batch.num_rows() - filtered.num_rows(),
            batch.num_rows()
        );
        Ok(filtered)
    }
}
