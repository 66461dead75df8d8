//! Feature vector builder.
//!
//! The trained pipeline was fit on the full admission-record column set, but
//! the form only collects three of those columns. This module maps the sparse
//! request onto a complete single-row feature vector: every expected column
//! starts at numeric `0`, then the known semantic slots are overwritten.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PredictionRequest;

/// Age column name in the fitted pipeline.
pub const AGE_COLUMN: &str = "AGE";

/// Gender column name in the fitted pipeline.
pub const GENDER_COLUMN: &str = "GENDER";

/// Rural-residence column name in the fitted pipeline.
pub const RURAL_COLUMN: &str = "RURAL";

/// Admission-type column name in the fitted pipeline.
pub const ADMISSION_COLUMN: &str = "TYPE_OF_ADMISSION-EMERGENCY/OPD";

/// Fixed admission type assumed for every request. The form carries no
/// control for it; emergency admission is assumed throughout.
pub const ADMISSION_TYPE: &str = "EMERGENCY";

/// A single cell of the feature row: numeric or categorical text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Interpret the value as a number. Text that parses as `f64` is
    /// accepted so a numeric column fed a string form still coerces.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as categorical text. Numbers render with minimal
    /// formatting (`0` rather than `0.0`) so an untouched default never
    /// accidentally matches a category.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Text(s) => s.clone(),
        }
    }
}

/// One record formatted to match the pipeline's expected input schema.
///
/// Created fresh per prediction request and immutable after construction.
/// The key set is guaranteed to equal the expected column list exactly, so
/// the pipeline's column-alignment step cannot fail on a built row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow(BTreeMap<String, FeatureValue>);

impl FeatureRow {
    /// Build the full feature vector for one request.
    ///
    /// Every expected column is initialized to `0`; columns matching a known
    /// semantic slot are then overwritten with the supplied (or, for the
    /// admission type, hardcoded) value. Columns outside the known slots
    /// stay `0`.
    #[must_use]
    pub fn build(expected_columns: &[String], request: &PredictionRequest) -> Self {
        let mut row: BTreeMap<String, FeatureValue> = expected_columns
            .iter()
            .map(|col| (col.clone(), FeatureValue::Number(0.0)))
            .collect();

        if let Some(v) = row.get_mut(AGE_COLUMN) {
            *v = FeatureValue::Number(f64::from(request.age));
        }
        if let Some(v) = row.get_mut(GENDER_COLUMN) {
            *v = FeatureValue::Text(request.gender.as_str().to_string());
        }
        if let Some(v) = row.get_mut(RURAL_COLUMN) {
            *v = FeatureValue::Text(request.rural.as_str().to_string());
        }
        if let Some(v) = row.get_mut(ADMISSION_COLUMN) {
            *v = FeatureValue::Text(ADMISSION_TYPE.to_string());
        }

        Self(row)
    }

    /// Look up a column by name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.0.get(column)
    }

    /// Number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(column, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FeatureValue)> for FeatureRow {
    fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
