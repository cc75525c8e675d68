//! Transformation of the raw surveillance table into the clean table
//!
//! The [`Transformer`] holds an ordered list of named [`TransformStep`]s built
//! from an explicit [`EncodingTable`] and [`TransformOptions`]. Each step
//! borrows its input and returns a new batch, so any step can be run and
//! tested on its own.

pub mod columns;
pub mod steps;

use std::sync::Arc;
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::schema::{EncodingTable, check_required_columns};

pub use steps::{
    ApplyCrossFieldRules, DeriveOutcome, DropMissingIndicators, NormalizeIndicators, PrepareAge,
    RelabelCategories, TransformStep,
};

/// Switches that change the composition of the clean table
///
/// Has no `Default`; callers state both switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Drop rows that still hold a missing indicator after cleaning
    pub drop_missing_rows: bool,
    /// Rescale age to `[0, 1]` using the observed min and max
    pub rescale_age: bool,
}

impl TransformOptions {
    #[must_use]
    pub const fn new(drop_missing_rows: bool, rescale_age: bool) -> Self {
        Self {
            drop_missing_rows,
            rescale_age,
        }
    }
}

/// Ordered cleaning pipeline over a raw batch
pub struct Transformer {
    encoding: Arc<EncodingTable>,
    steps: Vec<Box<dyn TransformStep>>,
}

impl Transformer {
    /// Build the canonical step sequence
    pub fn new(encoding: EncodingTable, options: TransformOptions) -> Result<Self> {
        encoding.validate()?;
        let encoding = Arc::new(encoding);

        let mut steps: Vec<Box<dyn TransformStep>> = vec![
            Box::new(NormalizeIndicators::new(encoding.clone())),
            Box::new(RelabelCategories::new(encoding.clone())),
            Box::new(DeriveOutcome::new(encoding.clone())),
            Box::new(PrepareAge::new(encoding.clone(), options.rescale_age)),
            Box::new(ApplyCrossFieldRules::new(encoding.clone())),
        ];
        if options.drop_missing_rows {
            steps.push(Box::new(DropMissingIndicators::new(encoding.clone())));
        }

        Ok(Self { encoding, steps })
    }

    /// Names of the steps in execution order
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step over `raw`
    ///
    /// Fails with `Error::Schema` before any step runs if an expected raw
    /// column is absent.
    pub fn clean(&self, raw: &RecordBatch) -> Result<RecordBatch> {
        check_required_columns(&raw.schema(), &self.encoding)?;

        let start = Instant::now();
        let mut current = raw.clone();
        for step in &self.steps {
            let step_start = Instant::now();
            current = step.apply(&current)?;
            log::debug!(
                "Step {} produced {} rows in {:?}",
                step.name(),
                current.num_rows(),
                step_start.elapsed()
            );
        }

        log::info!(
            "Cleaned {} raw rows into {} rows in {:?}",
            raw.num_rows(),
            current.num_rows(),
            start.elapsed()
        );
        Ok(current)
    }
}
