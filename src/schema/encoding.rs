//! Versioned encoding table for the raw surveillance columns.
//!
//! Every code, label, sentinel and column name the transformer relies on is
//! declared here once and passed into the transformer explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version of the canonical encoding produced by [`EncodingTable::v2`]
pub const ENCODING_VERSION: u32 = 2;

/// Raw code meaning "yes" in a binary indicator column
pub const YES_CODE: i64 = 1;
/// Raw code meaning "no" in a binary indicator column
pub const NO_CODE: i64 = 2;

/// Codes reserved for "not applicable / unknown"
pub const DEFAULT_SENTINELS: [i64; 3] = [97, 98, 99];

/// Literal stored in the date-of-death column when no death occurred
pub const DATE_SENTINEL: &str = "9999-99-99";

/// A binary indicator column and the name it takes after cleaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorField {
    pub source: String,
    pub target: String,
}

/// One code of a categorical column together with its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub code: i64,
    pub label: String,
}

/// A small-integer categorical column with a fixed code to label mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalField {
    pub source: String,
    pub target: String,
    pub labels: Vec<CategoryLabel>,
}

impl CategoricalField {
    /// Dictionary key of the label mapped from `code`
    #[must_use]
    pub fn key_for_code(&self, code: i64) -> Option<usize> {
        self.labels.iter().position(|l| l.code == code)
    }

    /// Dictionary key of `label`
    #[must_use]
    pub fn key_for_label(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.label == label)
    }

    /// Labels in dictionary order
    #[must_use]
    pub fn label_values(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.label.as_str()).collect()
    }
}

/// The date-or-sentinel column collapsed into a boolean outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeField {
    pub source: String,
    pub target: String,
    pub sentinel: String,
    /// `chrono` formats tried in order
    pub date_formats: Vec<String>,
}

/// The continuous age column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeField {
    pub source: String,
    pub target: String,
}

/// Data-correction rule: rows whose categorical column holds `label` get
/// every column in `force_false` overwritten with `false`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossFieldRule {
    pub name: String,
    pub column: String,
    pub label: String,
    pub force_false: Vec<String>,
}

/// Complete description of how raw columns are decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingTable {
    pub version: u32,
    /// Sentinel codes shared by every indicator column
    pub sentinels: Vec<i64>,
    pub indicators: Vec<IndicatorField>,
    pub categoricals: Vec<CategoricalField>,
    pub outcome: OutcomeField,
    pub age: AgeField,
    pub rules: Vec<CrossFieldRule>,
}

impl Default for EncodingTable {
    fn default() -> Self {
        Self::v2()
    }
}

fn indicator(source: &str, target: &str) -> IndicatorField {
    IndicatorField {
        source: source.to_string(),
        target: target.to_string(),
    }
}

fn categorical(source: &str, target: &str, labels: &[(i64, &str)]) -> CategoricalField {
    CategoricalField {
        source: source.to_string(),
        target: target.to_string(),
        labels: labels
            .iter()
            .map(|&(code, label)| CategoryLabel {
                code,
                label: label.to_string(),
            })
            .collect(),
    }
}

impl EncodingTable {
    /// Canonical encoding: sentinels `{97, 98, 99}`, text labels for sex and
    /// disposition
    #[must_use]
    pub fn v2() -> Self {
        Self {
            version: ENCODING_VERSION,
            sentinels: DEFAULT_SENTINELS.to_vec(),
            indicators: vec![
                indicator("PNEUMONIA", "pneumonia"),
                indicator("PREGNANT", "pregnant"),
                indicator("DIABETES", "diabetes"),
                indicator("COPD", "copd"),
                indicator("ASTHMA", "asthma"),
                indicator("INMSUPR", "immunosuppressed"),
                indicator("HIPERTENSION", "hypertension"),
                indicator("CARDIOVASCULAR", "cardiovascular"),
                indicator("RENAL_CHRONIC", "renal_chronic"),
                indicator("OTHER_DISEASE", "other_disease"),
                indicator("OBESITY", "obesity"),
                indicator("TOBACCO", "tobacco"),
                indicator("INTUBED", "intubated"),
                indicator("ICU", "icu"),
            ],
            categoricals: vec![
                categorical("SEX", "sex", &[(1, "female"), (2, "male")]),
                categorical(
                    "PATIENT_TYPE",
                    "disposition",
                    &[(1, "returned home"), (2, "hospitalization")],
                ),
            ],
            outcome: OutcomeField {
                source: "DATE_DIED".to_string(),
                target: "outcome".to_string(),
                sentinel: DATE_SENTINEL.to_string(),
                date_formats: vec!["%d/%m/%Y".to_string(), "%Y-%m-%d".to_string()],
            },
            age: AgeField {
                source: "AGE".to_string(),
                target: "age".to_string(),
            },
            rules: vec![
                CrossFieldRule {
                    name: "male_not_pregnant".to_string(),
                    column: "sex".to_string(),
                    label: "male".to_string(),
                    force_false: vec!["pregnant".to_string()],
                },
                CrossFieldRule {
                    name: "home_not_in_care".to_string(),
                    column: "disposition".to_string(),
                    label: "returned home".to_string(),
                    force_false: vec!["icu".to_string(), "intubated".to_string()],
                },
            ],
        }
    }

    /// Whether `code` is one of the shared sentinel codes
    #[must_use]
    pub fn is_sentinel(&self, code: i64) -> bool {
        self.sentinels.contains(&code)
    }

    /// Raw column names the transformer requires
    #[must_use]
    pub fn required_columns(&self) -> Vec<&str> {
        self.indicators
            .iter()
            .map(|f| f.source.as_str())
            .chain(self.categoricals.iter().map(|f| f.source.as_str()))
            .chain([self.outcome.source.as_str(), self.age.source.as_str()])
            .collect()
    }

    /// Clean names of the indicator columns
    #[must_use]
    pub fn indicator_targets(&self) -> Vec<&str> {
        self.indicators.iter().map(|f| f.target.as_str()).collect()
    }

    #[must_use]
    pub fn categorical(&self, target: &str) -> Option<&CategoricalField> {
        self.categoricals.iter().find(|f| f.target == target)
    }

    /// Check the table for internal contradictions
    pub fn validate(&self) -> Result<()> {
        let context = format!("encoding table v{}", self.version);

        if self
            .sentinels
            .iter()
            .any(|&s| s == YES_CODE || s == NO_CODE)
        {
            return Err(Error::config(
                context,
                "sentinel set overlaps the yes/no codes",
            ));
        }

        let mut targets: Vec<&str> = self
            .indicators
            .iter()
            .map(|f| f.target.as_str())
            .chain(self.categoricals.iter().map(|f| f.target.as_str()))
            .chain([self.outcome.target.as_str(), self.age.target.as_str()])
            .collect();
        targets.sort_unstable();
        if let Some(pair) = targets.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::config(
                context,
                format!("duplicate output column '{}'", pair[0]),
            ));
        }

        for field in &self.categoricals {
            if field.labels.is_empty() || field.labels.len() > i8::MAX as usize {
                return Err(Error::config(
                    context,
                    format!("categorical '{}' needs 1..=127 labels", field.source),
                ));
            }
            let mut codes: Vec<i64> = field.labels.iter().map(|l| l.code).collect();
            codes.sort_unstable();
            codes.dedup();
            if codes.len() != field.labels.len() {
                return Err(Error::config(
                    context,
                    format!("categorical '{}' maps a code twice", field.source),
                ));
            }
        }

        if self.outcome.date_formats.is_empty() {
            return Err(Error::config(context, "no date formats for the outcome field"));
        }

        for rule in &self.rules {
            let Some(field) = self.categorical(&rule.column) else {
                return Err(Error::config(
                    context,
                    format!("rule '{}' refers to unknown category '{}'", rule.name, rule.column),
                ));
            };
            if field.key_for_label(&rule.label).is_none() {
                return Err(Error::config(
                    context,
                    format!("rule '{}' refers to unknown label '{}'", rule.name, rule.label),
                ));
            }
            if let Some(unknown) = rule
                .force_false
                .iter()
                .find(|c| !self.indicators.iter().any(|f| &f.target == *c))
            {
                return Err(Error::config(
                    context,
                    format!("rule '{}' overwrites non-indicator '{unknown}'", rule.name),
                ));
            }
        }

        Ok(())
    }
}
