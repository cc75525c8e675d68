//! Cleaning pipeline for the COVID-19 case-surveillance dataset.
//!
//! The raw table is loaded into an Arrow record batch, decoded by an ordered
//! list of pure transformation steps driven by an explicit encoding table,
//! and persisted atomically as CSV or Parquet.

pub mod acquire;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod transform;
pub mod utils;

// Re-export the most common types for easier use
pub use acquire::{DatasetAcquirer, KaggleDownloader, NoopAcquirer};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use loader::{load, load_clean, read_clean, read_raw_csv};
pub use pipeline::{PipelineReport, clean_table, run};
pub use schema::EncodingTable;
pub use transform::{TransformOptions, TransformStep, Transformer};
pub use utils::io::{OutputFormat, save};

// Arrow types
pub use arrow::record_batch::RecordBatch;
