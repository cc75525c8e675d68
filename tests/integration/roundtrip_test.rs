use arrow::datatypes::DataType;

use covid_clean::schema::category_data_type;
use covid_clean::utils::test::{bool_values, label_values};
use covid_clean::{NoopAcquirer, OutputFormat, load_clean, run};

use crate::utils::{config_with_format, mixed_rows, place_raw_file};

fn assert_clean_types(format: OutputFormat) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_format(dir.path(), format);
    place_raw_file(&config, &mixed_rows());

    let report = run(&config, &NoopAcquirer).unwrap();
    assert_eq!(
        report.output_path.extension().and_then(|e| e.to_str()),
        Some(format.extension())
    );

    let clean = load_clean(&config).unwrap();
    let schema = clean.schema();
    for column in ["pneumonia", "pregnant", "icu", "outcome"] {
        assert_eq!(
            schema.field_with_name(column).unwrap().data_type(),
            &DataType::Boolean,
            "{column} in {format}"
        );
    }
    for column in ["sex", "disposition"] {
        assert_eq!(
            schema.field_with_name(column).unwrap().data_type(),
            &category_data_type(),
            "{column} in {format}"
        );
    }

    assert_eq!(
        bool_values(&clean, "obesity"),
        vec![Some(false), None, Some(false)]
    );
    assert_eq!(
        label_values(&clean, "sex"),
        vec![
            Some("female".to_string()),
            Some("female".to_string()),
            Some("male".to_string())
        ]
    );
}

#[test]
fn test_csv_artifact_reloads_with_clean_types() {
    assert_clean_types(OutputFormat::Csv);
}

#[test]
fn test_parquet_artifact_reloads_with_clean_types() {
    assert_clean_types(OutputFormat::Parquet);
}

#[test]
fn test_csv_and_parquet_hold_the_same_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv_config = config_with_format(&dir.path().join("csv"), OutputFormat::Csv);
    let parquet_config = config_with_format(&dir.path().join("parquet"), OutputFormat::Parquet);
    place_raw_file(&csv_config, &mixed_rows());
    place_raw_file(&parquet_config, &mixed_rows());

    run(&csv_config, &NoopAcquirer).unwrap();
    run(&parquet_config, &NoopAcquirer).unwrap();

    let from_csv = load_clean(&csv_config).unwrap();
    let from_parquet = load_clean(&parquet_config).unwrap();
    assert_eq!(from_csv.num_rows(), from_parquet.num_rows());
    for column in ["sex", "disposition"] {
        assert_eq!(label_values(&from_csv, column), label_values(&from_parquet, column));
    }
    for column in ["pregnant", "diabetes", "outcome"] {
        assert_eq!(bool_values(&from_csv, column), bool_values(&from_parquet, column));
    }
}
