//! # Acuity
//!
//! Hospital mortality risk predictor.
//!
//! A terminal form collects three patient attributes (age, gender,
//! rural/urban status), maps them onto the full feature vector a pre-trained
//! classification pipeline expects, and displays the predicted mortality-risk
//! probability.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (request, feature row, prediction)
//! - `ports`: Trait boundary for the trained pipeline
//! - `adapters`: Concrete implementations (JSON artifact, log sanitizer)
//! - `application`: The prediction use case
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{FeatureRow, Gender, Prediction, PredictionRequest, RiskBand, Rural};

/// Result type for Acuity operations
pub type Result<T> = std::result::Result<T, AcuityError>;

/// Main error type for Acuity
#[derive(Debug, thiserror::Error)]
pub enum AcuityError {
    #[error("Inference failed: {0}")]
    Pipeline(#[from] ports::PipelineError),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
