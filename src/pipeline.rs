//! End-to-end cleaning run: load, transform, persist

use std::path::PathBuf;
use std::time::{Duration, Instant};

use arrow::record_batch::RecordBatch;

use crate::acquire::DatasetAcquirer;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::loader::load;
use crate::transform::Transformer;
use crate::utils::io::save;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub raw_rows: usize,
    pub clean_rows: usize,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

impl PipelineReport {
    #[must_use]
    pub const fn dropped_rows(&self) -> usize {
        self.raw_rows - self.clean_rows
    }
}

/// Clean an already loaded raw table with the configured encoding and options
pub fn clean_table(config: &PipelineConfig, raw: &RecordBatch) -> Result<RecordBatch> {
    let transformer = Transformer::new(config.encoding.clone(), config.transform_options())?;
    transformer.clean(raw)
}

/// Run the whole pipeline and overwrite the clean artifact
pub fn run(config: &PipelineConfig, acquirer: &dyn DatasetAcquirer) -> Result<PipelineReport> {
    let start = Instant::now();
    config.validate()?;

    let raw = load(config, acquirer)?;
    let clean = clean_table(config, &raw)?;

    let output_path = config.clean_file_path();
    save(&clean, &output_path, config.output_format)?;

    Ok(PipelineReport {
        raw_rows: raw.num_rows(),
        clean_rows: clean.num_rows(),
        output_path,
        elapsed: start.elapsed(),
    })
}
