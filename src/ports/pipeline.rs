//! Pipeline port: Trait for the externally trained prediction pipeline.
//!
//! The pipeline is an opaque collaborator. This crate depends on its fitted
//! column list and its probability-estimation operation; training, feature
//! engineering, and validation live outside this repository.

use crate::domain::FeatureRow;

/// Errors raised during inference.
///
/// None of these reach the user as-is; the request handler collapses every
/// failure into a single error string at the call boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("column {0:?} missing from input row")]
    MissingColumn(String),

    #[error("column {column:?}: cannot interpret {value:?} as a number")]
    TypeCoercion { column: String, value: String },

    #[error("pipeline produced a non-finite probability")]
    NonFinite,
}

/// Trait for the trained classification pipeline.
///
/// Implementations expose:
/// - The exact input feature names, in fit order
/// - Probability estimation over a single feature row
pub trait Pipeline: Send + Sync {
    /// The input columns the pipeline was fit on, in fit order.
    ///
    /// The feature-vector builder uses this as the authoritative column list.
    fn feature_names(&self) -> &[String];

    /// Estimate per-class probabilities for a single row.
    ///
    /// Returns `[p(survival), p(mortality)]`; the positive (mortality) class
    /// is index 1. Both values lie in [0, 1] and sum to 1.
    ///
    /// # Errors
    /// Returns `PipelineError::MissingColumn` if the row does not cover the
    /// fitted schema, `PipelineError::TypeCoercion` if a numeric column holds
    /// text that is not a number.
    fn predict_proba(&self, row: &FeatureRow) -> Result<[f64; 2], PipelineError>;
}
