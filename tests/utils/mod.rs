use std::path::Path;

use covid_clean::utils::test::{RawRow, raw_csv, write_file};
use covid_clean::{OutputFormat, PipelineConfig};

/// Folder the raw table is placed in below the raw data root
pub const DATASET_FOLDER: &str = "covid19-dataset";

/// Configuration rooted in `root` with every location inside it
#[must_use]
pub fn config_in(root: &Path, drop_missing_rows: bool) -> PipelineConfig {
    let mut config = PipelineConfig::new(drop_missing_rows, false);
    config.raw_data_root = root.join("raw");
    config.interim_data_root = root.join("interim");
    config.dataset_folder = Some(DATASET_FOLDER.to_string());
    config
}

/// Same as [`config_in`] with a different artifact format
#[must_use]
pub fn config_with_format(root: &Path, format: OutputFormat) -> PipelineConfig {
    let mut config = config_in(root, false);
    config.output_format = format;
    config
}

/// Write `rows` as the raw CSV file the configuration points at
pub fn place_raw_file(config: &PipelineConfig, rows: &[RawRow]) {
    write_file(&config.raw_file_path(), &raw_csv(rows));
}

/// A small mixed dataset: one complete record, one with missing answers
/// and one deceased male sent home
#[must_use]
pub fn mixed_rows() -> Vec<RawRow> {
    vec![
        RawRow::default(),
        RawRow {
            diabetes: 98,
            obesity: 99,
            ..RawRow::default()
        },
        RawRow {
            sex: 2,
            patient_type: 1,
            pregnant: 97,
            icu: 97,
            intubed: 97,
            date_died: "03/05/2020".to_string(),
            age: 71,
            ..RawRow::default()
        },
    ]
}
