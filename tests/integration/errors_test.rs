use std::path::Path;

use covid_clean::utils::test::{RawRow, raw_batch, write_file};
use covid_clean::{
    DatasetAcquirer, Error, NoopAcquirer, PipelineConfig, clean_table, load, load_clean,
    read_raw_csv, run,
};

use crate::utils::{config_in, mixed_rows, place_raw_file};

/// Acquirer that always fails, standing in for an unreachable host
struct FailingAcquirer;

impl DatasetAcquirer for FailingAcquirer {
    fn ensure_downloaded(&self, repo: &str, destination: &Path) -> covid_clean::Result<()> {
        Err(Error::acquisition(repo, destination, "host unreachable"))
    }
}

#[test]
fn test_missing_column_is_schema_error() {
    let raw = raw_batch(&[RawRow::default()]);
    let index = raw.schema().index_of("DATE_DIED").unwrap();
    let without_date = raw.project(
        &(0..raw.num_columns())
            .filter(|i| *i != index)
            .collect::<Vec<_>>(),
    )
    .unwrap();

    let err = clean_table(&PipelineConfig::new(false, false), &without_date).unwrap_err();
    assert!(matches!(&err, Error::Schema { column } if column == "DATE_DIED"));
    assert_eq!(err.category(), "schema");
}

#[test]
fn test_malformed_csv_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    write_file(&path, "SEX,AGE\n1,40\n2,51,extra\n");

    let err = read_raw_csv(&path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.to_string().contains("broken.csv"));
}

#[test]
fn test_absent_raw_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);

    let err = run(&config, &NoopAcquirer).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(!config.clean_file_path().exists());
}

#[test]
fn test_acquisition_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);

    let err = load(&config, &FailingAcquirer).unwrap_err();
    assert!(matches!(err, Error::Acquisition { .. }));
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("meirnizri/covid19-dataset"));
}

#[test]
fn test_load_clean_without_artifact_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);
    place_raw_file(&config, &mixed_rows());

    let err = load_clean(&config).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn test_failed_run_keeps_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);
    place_raw_file(&config, &mixed_rows());
    run(&config, &NoopAcquirer).unwrap();
    let before = std::fs::read(config.clean_file_path()).unwrap();

    // Second run against a raw file missing a required column
    write_file(&config.raw_file_path(), "SEX,AGE\n1,40\n");
    let err = run(&config, &NoopAcquirer).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
    assert_eq!(std::fs::read(config.clean_file_path()).unwrap(), before);
}
