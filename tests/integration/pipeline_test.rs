use std::fs;

use covid_clean::utils::test::{
    RawRow, bool_values, column_names, f64_values, i64_values, label_values,
};
use covid_clean::{NoopAcquirer, load_clean, run};

use crate::utils::{config_in, mixed_rows, place_raw_file};

/// Column layout of the clean table, in order
const CLEAN_COLUMNS: [&str; 21] = [
    "USMER",
    "MEDICAL_UNIT",
    "sex",
    "disposition",
    "intubated",
    "pneumonia",
    "age",
    "pregnant",
    "diabetes",
    "copd",
    "asthma",
    "immunosuppressed",
    "hypertension",
    "other_disease",
    "cardiovascular",
    "obesity",
    "renal_chronic",
    "tobacco",
    "CLASIFFICATION_FINAL",
    "icu",
    "outcome",
];

#[test]
fn test_run_writes_clean_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);
    place_raw_file(&config, &mixed_rows());

    let report = run(&config, &NoopAcquirer).unwrap();
    assert_eq!(report.raw_rows, 3);
    assert_eq!(report.clean_rows, 3);
    assert_eq!(report.dropped_rows(), 0);
    assert_eq!(report.output_path, config.clean_file_path());
    assert!(report.output_path.ends_with("covid-data-clean.csv"));

    let clean = load_clean(&config).unwrap();
    assert_eq!(column_names(&clean), CLEAN_COLUMNS.map(String::from).to_vec());
    assert_eq!(
        label_values(&clean, "sex"),
        vec![
            Some("female".to_string()),
            Some("female".to_string()),
            Some("male".to_string())
        ]
    );
    assert_eq!(
        label_values(&clean, "disposition"),
        vec![
            Some("hospitalization".to_string()),
            Some("hospitalization".to_string()),
            Some("returned home".to_string())
        ]
    );
    assert_eq!(
        bool_values(&clean, "diabetes"),
        vec![Some(false), None, Some(false)]
    );
    assert_eq!(
        bool_values(&clean, "outcome"),
        vec![Some(false), Some(false), Some(true)]
    );
    assert_eq!(i64_values(&clean, "age"), vec![Some(40), Some(40), Some(71)]);
}

#[test]
fn test_drop_missing_rows_removes_incomplete_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), true);
    place_raw_file(&config, &mixed_rows());

    let report = run(&config, &NoopAcquirer).unwrap();
    assert_eq!(report.raw_rows, 3);
    assert_eq!(report.clean_rows, 2);
    assert_eq!(report.dropped_rows(), 1);

    let clean = load_clean(&config).unwrap();
    for column in ["diabetes", "obesity", "pregnant", "icu", "intubated"] {
        assert!(
            bool_values(&clean, column).iter().all(Option::is_some),
            "{column} still holds missing values"
        );
    }
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);
    place_raw_file(&config, &mixed_rows());

    run(&config, &NoopAcquirer).unwrap();
    let first = fs::read(config.clean_file_path()).unwrap();
    let first_table = load_clean(&config).unwrap();

    run(&config, &NoopAcquirer).unwrap();
    let second = fs::read(config.clean_file_path()).unwrap();
    let second_table = load_clean(&config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_table, second_table);
}

#[test]
fn test_run_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), false);
    place_raw_file(&config, &mixed_rows());

    run(&config, &NoopAcquirer).unwrap();
    let entries: Vec<_> = fs::read_dir(&config.interim_data_root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["covid-data-clean.csv".to_string()]);
}

#[test]
fn test_rescaled_age_in_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), false);
    config.rescale_age = true;
    let rows: Vec<_> = [10, 20, 30]
        .into_iter()
        .map(|age| RawRow {
            age,
            ..Default::default()
        })
        .collect();
    place_raw_file(&config, &rows);

    run(&config, &NoopAcquirer).unwrap();
    let clean = load_clean(&config).unwrap();
    assert_eq!(
        f64_values(&clean, "age"),
        vec![Some(0.0), Some(0.5), Some(1.0)]
    );
}
