//! Prediction service: from raw request to displayed result.
//!
//! Each invocation is independent and stateless: validate the request, build
//! the full feature vector against the pipeline's fitted column list, invoke
//! the pipeline, and take the positive-class probability. `handle` is the
//! single boundary where failures become user-visible text.

use std::sync::Arc;

use crate::domain::{FeatureRow, Prediction, PredictionRequest};
use crate::ports::Pipeline;
use crate::AcuityError;

/// Service for running mortality-risk predictions.
///
/// Holds shared read-only ownership of the loaded pipeline; the artifact is
/// loaded once at process start and injected here (no ambient globals).
pub struct PredictionService<P: Pipeline> {
    pipeline: Arc<P>,
}

impl<P: Pipeline> PredictionService<P> {
    /// Create a new prediction service over a loaded pipeline.
    pub fn new(pipeline: Arc<P>) -> Self {
        Self { pipeline }
    }

    /// The pipeline's fitted input columns, in fit order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        self.pipeline.feature_names()
    }

    /// Run one prediction.
    ///
    /// # Errors
    /// Returns error if the request fails validation or inference fails.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, AcuityError> {
        request.validate().map_err(AcuityError::Validation)?;

        let row = FeatureRow::build(self.pipeline.feature_names(), request);
        tracing::debug!("Built feature row with {} columns", row.len());

        let proba = self.pipeline.predict_proba(&row)?;
        let prediction = Prediction::new(proba[1]);

        tracing::info!(
            "Prediction complete: probability={:.4}, band={}",
            prediction.probability,
            prediction.band
        );

        Ok(prediction)
    }

    /// Synchronous request handler: current field values in, output string
    /// out.
    ///
    /// Any failure during preprocessing or inference is caught here and
    /// rendered as a warning string; nothing propagates and nothing is
    /// retried.
    #[must_use]
    pub fn handle(&self, request: &PredictionRequest) -> String {
        match self.predict(request) {
            Ok(prediction) => prediction.summary(),
            Err(e) => {
                tracing::warn!("Prediction failed: {e}");
                format!("⚠️ Error: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureRow, Gender, Rural};
    use crate::ports::PipelineError;

    /// Pipeline double with a fixed schema and a constant probability.
    struct FixedPipeline {
        names: Vec<String>,
        probability: f64,
    }

    impl FixedPipeline {
        fn new(probability: f64) -> Self {
            Self {
                names: ["AGE", "GENDER", "RURAL", "TYPE_OF_ADMISSION-EMERGENCY/OPD"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                probability,
            }
        }
    }

    impl Pipeline for FixedPipeline {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_proba(&self, row: &FeatureRow) -> Result<[f64; 2], PipelineError> {
            for name in &self.names {
                if row.get(name).is_none() {
                    return Err(PipelineError::MissingColumn(name.clone()));
                }
            }
            Ok([1.0 - self.probability, self.probability])
        }
    }

    /// Pipeline double whose inference always raises.
    struct FailingPipeline {
        names: Vec<String>,
    }

    impl Pipeline for FailingPipeline {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_proba(&self, _row: &FeatureRow) -> Result<[f64; 2], PipelineError> {
            Err(PipelineError::MissingColumn("GLUCOSE".into()))
        }
    }

    #[test]
    fn test_predict_takes_positive_class() {
        let service = PredictionService::new(Arc::new(FixedPipeline::new(0.42)));
        let prediction = service
            .predict(&PredictionRequest::default())
            .expect("predict");
        assert!((prediction.probability - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_renders_summary() {
        let service = PredictionService::new(Arc::new(FixedPipeline::new(0.1234)));
        let output = service.handle(&PredictionRequest::default());
        assert_eq!(output, "Predicted mortality risk: 12.34%");
    }

    #[test]
    fn test_handle_converts_pipeline_failure_to_warning_string() {
        let service = PredictionService::new(Arc::new(FailingPipeline {
            names: vec!["AGE".into()],
        }));
        let output = service.handle(&PredictionRequest::default());
        assert!(output.starts_with("⚠️ Error:"), "got {output:?}");
        assert!(output.contains("GLUCOSE"));
    }

    #[test]
    fn test_handle_rejects_invalid_age() {
        let service = PredictionService::new(Arc::new(FixedPipeline::new(0.5)));
        let request = PredictionRequest::new(500, Gender::Female, Rural::Yes);
        let output = service.handle(&request);
        assert!(output.starts_with("⚠️ Error:"));
        assert!(output.contains("out of range"));
    }

    #[test]
    fn test_each_invocation_is_stateless() {
        let service = PredictionService::new(Arc::new(FixedPipeline::new(0.9)));
        let a = service.predict(&PredictionRequest::default()).expect("a");
        let b = service
            .predict(&PredictionRequest::new(20, Gender::Female, Rural::Yes))
            .expect("b");
        assert!((a.probability - b.probability).abs() < f64::EPSILON);
    }
}
