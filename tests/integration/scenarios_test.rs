use covid_clean::utils::test::{
    RawRow, bool_values, f64_values, i64_values, label_values, raw_batch,
};
use covid_clean::{PipelineConfig, clean_table};

fn config(drop_missing_rows: bool, rescale_age: bool) -> PipelineConfig {
    PipelineConfig::new(drop_missing_rows, rescale_age)
}

/// A male sent home with unanswered care questions gets definite "no"s
#[test]
fn test_male_returned_home_corrections() {
    let raw = raw_batch(&[RawRow {
        sex: 2,
        patient_type: 1,
        pregnant: 97,
        icu: 97,
        intubed: 97,
        ..RawRow::default()
    }]);

    let clean = clean_table(&config(true, false), &raw).unwrap();
    assert_eq!(clean.num_rows(), 1);
    assert_eq!(label_values(&clean, "sex"), vec![Some("male".to_string())]);
    assert_eq!(
        label_values(&clean, "disposition"),
        vec![Some("returned home".to_string())]
    );
    assert_eq!(bool_values(&clean, "pregnant"), vec![Some(false)]);
    assert_eq!(bool_values(&clean, "icu"), vec![Some(false)]);
    assert_eq!(bool_values(&clean, "intubated"), vec![Some(false)]);
}

/// A pregnant hospitalized female keeps every answer
#[test]
fn test_female_pregnancy_is_kept() {
    let raw = raw_batch(&[RawRow {
        pregnant: 1,
        icu: 1,
        intubed: 1,
        ..RawRow::default()
    }]);

    let clean = clean_table(&config(true, false), &raw).unwrap();
    assert_eq!(bool_values(&clean, "pregnant"), vec![Some(true)]);
    assert_eq!(bool_values(&clean, "icu"), vec![Some(true)]);
    assert_eq!(bool_values(&clean, "intubated"), vec![Some(true)]);
}

/// A hospitalized male with unknown care answers is not corrected
#[test]
fn test_hospitalized_male_icu_stays_missing() {
    let raw = raw_batch(&[RawRow {
        sex: 2,
        patient_type: 2,
        icu: 97,
        ..RawRow::default()
    }]);

    let kept = clean_table(&config(false, false), &raw).unwrap();
    assert_eq!(bool_values(&kept, "icu"), vec![None]);

    let dropped = clean_table(&config(true, false), &raw).unwrap();
    assert_eq!(dropped.num_rows(), 0);
}

#[test]
fn test_outcome_from_date_of_death() {
    let raw = raw_batch(&[
        RawRow::default(),
        RawRow {
            date_died: "16/06/2020".to_string(),
            ..RawRow::default()
        },
        RawRow {
            date_died: "2020-06-16".to_string(),
            ..RawRow::default()
        },
        RawRow {
            date_died: "not a date".to_string(),
            ..RawRow::default()
        },
    ]);

    let clean = clean_table(&config(false, false), &raw).unwrap();
    assert!(clean.schema().index_of("DATE_DIED").is_err());
    assert_eq!(
        bool_values(&clean, "outcome"),
        vec![Some(false), Some(true), Some(true), None]
    );
}

#[test]
fn test_outcome_does_not_drive_row_dropping() {
    let raw = raw_batch(&[RawRow {
        date_died: "garbage".to_string(),
        ..RawRow::default()
    }]);

    let clean = clean_table(&config(true, false), &raw).unwrap();
    assert_eq!(clean.num_rows(), 1);
    assert_eq!(bool_values(&clean, "outcome"), vec![None]);
}

#[test]
fn test_age_rescaling() {
    let rows: Vec<_> = [10, 20, 30]
        .into_iter()
        .map(|age| RawRow {
            age,
            ..RawRow::default()
        })
        .collect();
    let raw = raw_batch(&rows);

    let rescaled = clean_table(&config(false, true), &raw).unwrap();
    assert_eq!(
        f64_values(&rescaled, "age"),
        vec![Some(0.0), Some(0.5), Some(1.0)]
    );

    let plain = clean_table(&config(false, false), &raw).unwrap();
    assert_eq!(
        i64_values(&plain, "age"),
        vec![Some(10), Some(20), Some(30)]
    );
}

#[test]
fn test_clean_is_deterministic() {
    let raw = raw_batch(&[
        RawRow::default(),
        RawRow {
            sex: 2,
            patient_type: 1,
            pregnant: 97,
            ..RawRow::default()
        }
        .with_all_indicators(1),
    ]);
    let config = config(false, true);

    let first = clean_table(&config, &raw).unwrap();
    let second = clean_table(&config, &raw).unwrap();
    assert_eq!(first, second);
}
