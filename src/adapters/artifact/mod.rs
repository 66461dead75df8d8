//! Artifact adapter: Implementation of `Pipeline` over a JSON model export.
//!
//! The trained pipeline is exported by an external training job as a JSON
//! document describing the fitted preprocessing (per-column standard scaling
//! and one-hot encoding) and the logistic classifier on top of it. This
//! adapter loads that document, validates its structure, and evaluates it
//! over a single feature row.
//!
//! The artifact's format and training are out of scope here; a document that
//! fails structural validation aborts process startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::FeatureRow;
use crate::ports::{Pipeline, PipelineError};

/// Errors loading or validating the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("no pipeline JSON found in {0:?} (expected pipeline.json or model.json)")]
    NotFound(PathBuf),

    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid artifact format: {0}")]
    Format(#[from] serde_json::Error),

    #[error("malformed pipeline artifact: {0}")]
    Invalid(String),
}

/// Fitted preprocessing for one input column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// Standard scaling: `(x - mean) / std`, one encoded slot.
    Numeric { mean: f64, std: f64 },
    /// One-hot encoding over the listed categories, one slot per category.
    /// An unknown category encodes to all zeros, matching the training
    /// encoder's ignore-unknown behavior.
    Categorical { categories: Vec<String> },
}

/// One input column of the fitted pipeline, in fit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(flatten)]
    pub transform: ColumnTransform,
}

impl ColumnSpec {
    fn encoded_width(&self) -> usize {
        match &self.transform {
            ColumnTransform::Numeric { .. } => 1,
            ColumnTransform::Categorical { categories } => categories.len(),
        }
    }
}

/// The exported pipeline document as written by the training job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub columns: Vec<ColumnSpec>,
    /// Logistic-regression weights over the encoded space.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl PipelineSpec {
    fn encoded_width(&self) -> usize {
        self.columns.iter().map(ColumnSpec::encoded_width).sum()
    }
}

/// A loaded, validated pipeline artifact.
///
/// Loaded once at process start and shared read-only afterwards; the struct
/// carries no interior mutability.
#[derive(Debug)]
pub struct ArtifactPipeline {
    spec: PipelineSpec,
    feature_names: Vec<String>,
}

impl ArtifactPipeline {
    /// Load and validate a pipeline artifact.
    ///
    /// `path` may point at the JSON file itself or at a directory containing
    /// `pipeline.json` (preferred) or `model.json`.
    ///
    /// # Errors
    /// Returns error if no artifact is found, the JSON does not parse, or
    /// structural validation fails.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact_path = Self::resolve(path)?;

        let content = std::fs::read_to_string(&artifact_path)?;
        let spec: PipelineSpec = serde_json::from_str(&content)?;
        Self::validate(&spec)?;

        tracing::info!(
            "Loaded pipeline from {:?} (n_features={}, encoded_width={})",
            artifact_path,
            spec.columns.len(),
            spec.encoded_width()
        );

        let feature_names = spec.columns.iter().map(|c| c.name.clone()).collect();
        Ok(Self {
            spec,
            feature_names,
        })
    }

    fn resolve(path: &Path) -> Result<PathBuf, ArtifactError> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        [path.join("pipeline.json"), path.join("model.json")]
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| ArtifactError::NotFound(path.to_path_buf()))
    }

    fn validate(spec: &PipelineSpec) -> Result<(), ArtifactError> {
        if spec.columns.is_empty() {
            return Err(ArtifactError::Invalid("empty column list".into()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for col in &spec.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(ArtifactError::Invalid(format!(
                    "duplicate column {:?}",
                    col.name
                )));
            }
            match &col.transform {
                ColumnTransform::Numeric { mean, std } => {
                    if !mean.is_finite() || !std.is_finite() || *std <= 0.0 {
                        return Err(ArtifactError::Invalid(format!(
                            "column {:?}: scaler requires finite mean and positive std",
                            col.name
                        )));
                    }
                }
                ColumnTransform::Categorical { categories } => {
                    if categories.is_empty() {
                        return Err(ArtifactError::Invalid(format!(
                            "column {:?}: empty category list",
                            col.name
                        )));
                    }
                }
            }
        }

        let width = spec.encoded_width();
        if spec.coefficients.len() != width {
            return Err(ArtifactError::Invalid(format!(
                "coefficient length {} does not match encoded width {width}",
                spec.coefficients.len()
            )));
        }
        if spec.coefficients.iter().any(|c| !c.is_finite()) || !spec.intercept.is_finite() {
            return Err(ArtifactError::Invalid(
                "non-finite coefficient or intercept".into(),
            ));
        }

        Ok(())
    }

    /// Encode a feature row into the pipeline's fitted vector space.
    ///
    /// Alignment follows fit order; every fitted column must be present.
    fn encode(&self, row: &FeatureRow) -> Result<Vec<f64>, PipelineError> {
        let mut encoded = Vec::with_capacity(self.spec.encoded_width());

        for col in &self.spec.columns {
            let value = row
                .get(&col.name)
                .ok_or_else(|| PipelineError::MissingColumn(col.name.clone()))?;

            match &col.transform {
                ColumnTransform::Numeric { mean, std } => {
                    let x = value.as_number().ok_or_else(|| PipelineError::TypeCoercion {
                        column: col.name.clone(),
                        value: value.as_text(),
                    })?;
                    encoded.push((x - mean) / std);
                }
                ColumnTransform::Categorical { categories } => {
                    let text = value.as_text();
                    for category in categories {
                        encoded.push(if *category == text { 1.0 } else { 0.0 });
                    }
                }
            }
        }

        Ok(encoded)
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
}

impl Pipeline for ArtifactPipeline {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<[f64; 2], PipelineError> {
        let encoded = self.encode(row)?;

        let logit: f64 = encoded
            .iter()
            .zip(self.spec.coefficients.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.spec.intercept;

        let probability = Self::sigmoid(logit);
        if !probability.is_finite() {
            return Err(PipelineError::NonFinite);
        }

        tracing::debug!(
            "Evaluated pipeline: logit={logit:.4}, probability={probability:.4}"
        );

        Ok([1.0 - probability, probability])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureValue, Gender, PredictionRequest, Rural};
    use tempfile::tempdir;

    fn test_spec() -> PipelineSpec {
        PipelineSpec {
            columns: vec![
                ColumnSpec {
                    name: "AGE".into(),
                    transform: ColumnTransform::Numeric {
                        mean: 60.0,
                        std: 15.0,
                    },
                },
                ColumnSpec {
                    name: "GENDER".into(),
                    transform: ColumnTransform::Categorical {
                        categories: vec!["MALE".into(), "FEMALE".into()],
                    },
                },
                ColumnSpec {
                    name: "HB".into(),
                    transform: ColumnTransform::Numeric {
                        mean: 12.0,
                        std: 2.5,
                    },
                },
            ],
            coefficients: vec![0.8, 0.1, -0.1, -0.3],
            intercept: -1.2,
        }
    }

    fn pipeline_from(spec: PipelineSpec) -> ArtifactPipeline {
        let feature_names = spec.columns.iter().map(|c| c.name.clone()).collect();
        ArtifactPipeline {
            spec,
            feature_names,
        }
    }

    fn write_spec(path: &std::path::Path, spec: &PipelineSpec) {
        let json = serde_json::to_string_pretty(spec).expect("serialize spec");
        std::fs::write(path, json).expect("write spec");
    }

    #[test]
    fn test_load_from_directory_prefers_pipeline_json() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        let mut preferred = test_spec();
        preferred.intercept = -9.0;
        write_spec(&dir.join("pipeline.json"), &preferred);
        write_spec(&dir.join("model.json"), &test_spec());

        let pipeline = ArtifactPipeline::load(dir).expect("load artifact");
        assert_eq!(pipeline.spec.intercept, -9.0);
        assert_eq!(pipeline.feature_names(), &["AGE", "GENDER", "HB"]);
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("exported.json");
        write_spec(&file, &test_spec());

        let pipeline = ArtifactPipeline::load(&file).expect("load artifact");
        assert_eq!(pipeline.feature_names().len(), 3);
    }

    #[test]
    fn test_load_missing_artifact() {
        let temp = tempdir().expect("tempdir");
        let err = ArtifactPipeline::load(temp.path()).expect_err("must fail");
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn test_validation_rejects_length_mismatch() {
        let mut spec = test_spec();
        spec.coefficients.pop();
        let err = ArtifactPipeline::validate(&spec).expect_err("must fail");
        assert!(err.to_string().contains("encoded width"));
    }

    #[test]
    fn test_validation_rejects_bad_scaler() {
        let mut spec = test_spec();
        spec.columns[0].transform = ColumnTransform::Numeric {
            mean: 60.0,
            std: 0.0,
        };
        assert!(ArtifactPipeline::validate(&spec).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_categories() {
        let mut spec = test_spec();
        spec.columns[1].transform = ColumnTransform::Categorical { categories: vec![] };
        spec.coefficients = vec![0.8, -0.3];
        assert!(ArtifactPipeline::validate(&spec).is_err());
    }

    #[test]
    fn test_validation_rejects_duplicate_columns() {
        let mut spec = test_spec();
        spec.columns[2].name = "AGE".into();
        assert!(ArtifactPipeline::validate(&spec).is_err());
    }

    #[test]
    fn test_probability_bounds_and_distribution() {
        let pipeline = pipeline_from(test_spec());
        let request = PredictionRequest::default();
        let row = FeatureRow::build(pipeline.feature_names(), &request);

        let proba = pipeline.predict_proba(&row).expect("predict");
        assert!(proba[0] >= 0.0 && proba[0] <= 1.0);
        assert!(proba[1] >= 0.0 && proba[1] <= 1.0);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_age_coefficient_is_monotonic() {
        let pipeline = pipeline_from(test_spec());

        let young = FeatureRow::build(
            pipeline.feature_names(),
            &PredictionRequest::new(30, Gender::Male, Rural::No),
        );
        let old = FeatureRow::build(
            pipeline.feature_names(),
            &PredictionRequest::new(90, Gender::Male, Rural::No),
        );

        let p_young = pipeline.predict_proba(&young).expect("predict")[1];
        let p_old = pipeline.predict_proba(&old).expect("predict")[1];
        assert!(p_old > p_young, "positive AGE weight must raise risk");
    }

    #[test]
    fn test_known_logit() {
        // Scaled-identity numeric column, everything else zeroed out.
        let spec = PipelineSpec {
            columns: vec![ColumnSpec {
                name: "AGE".into(),
                transform: ColumnTransform::Numeric {
                    mean: 0.0,
                    std: 1.0,
                },
            }],
            coefficients: vec![0.0],
            intercept: 0.0,
        };
        let pipeline = pipeline_from(spec);
        let row = FeatureRow::build(
            pipeline.feature_names(),
            &PredictionRequest::new(50, Gender::Male, Rural::No),
        );

        // Zero logit is exactly even odds.
        let proba = pipeline.predict_proba(&row).expect("predict");
        assert!((proba[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_one_hot_alignment() {
        let pipeline = pipeline_from(test_spec());

        let male = FeatureRow::build(
            pipeline.feature_names(),
            &PredictionRequest::new(60, Gender::Male, Rural::No),
        );
        let female = FeatureRow::build(
            pipeline.feature_names(),
            &PredictionRequest::new(60, Gender::Female, Rural::No),
        );

        let enc_male = pipeline.encode(&male).expect("encode");
        let enc_female = pipeline.encode(&female).expect("encode");

        // Slots: [AGE, GENDER=MALE, GENDER=FEMALE, HB]
        assert_eq!(enc_male[1], 1.0);
        assert_eq!(enc_male[2], 0.0);
        assert_eq!(enc_female[1], 0.0);
        assert_eq!(enc_female[2], 1.0);
    }

    #[test]
    fn test_unknown_category_encodes_to_zeros() {
        // A defaulted (numeric 0) value in a categorical column must not
        // match any category.
        let spec = PipelineSpec {
            columns: vec![ColumnSpec {
                name: "TYPE_OF_ADMISSION-EMERGENCY/OPD".into(),
                transform: ColumnTransform::Categorical {
                    categories: vec!["EMERGENCY".into(), "OPD".into()],
                },
            }],
            coefficients: vec![1.0, -1.0],
            intercept: 0.0,
        };
        let pipeline = pipeline_from(spec);

        let row: FeatureRow = [(
            "TYPE_OF_ADMISSION-EMERGENCY/OPD".to_string(),
            FeatureValue::Number(0.0),
        )]
        .into_iter()
        .collect();

        let encoded = pipeline.encode(&row).expect("encode");
        assert_eq!(encoded, vec![0.0, 0.0]);
    }

    #[test]
    fn test_shipped_artifact_predicts() {
        let pipeline =
            ArtifactPipeline::load(std::path::Path::new("models")).expect("demo artifact loads");
        assert!(pipeline
            .feature_names()
            .iter()
            .any(|n| n == "TYPE_OF_ADMISSION-EMERGENCY/OPD"));

        let row = FeatureRow::build(pipeline.feature_names(), &PredictionRequest::default());
        let proba = pipeline.predict_proba(&row).expect("predict");
        assert!(proba[1] > 0.0 && proba[1] < 1.0);
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let pipeline = pipeline_from(test_spec());
        // Build against a narrower schema than the pipeline's.
        let row = FeatureRow::build(
            &["AGE".to_string()],
            &PredictionRequest::default(),
        );

        let err = pipeline.predict_proba(&row).expect_err("must fail");
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "GENDER"));
    }

    #[test]
    fn test_text_in_numeric_column_is_coercion_error() {
        let spec = PipelineSpec {
            columns: vec![ColumnSpec {
                name: "HB".into(),
                transform: ColumnTransform::Numeric {
                    mean: 12.0,
                    std: 2.5,
                },
            }],
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        let pipeline = pipeline_from(spec);

        let row: FeatureRow = [("HB".to_string(), FeatureValue::Text("LOW".into()))]
            .into_iter()
            .collect();

        let err = pipeline.predict_proba(&row).expect_err("must fail");
        assert!(matches!(err, PipelineError::TypeCoercion { .. }));
    }
}
