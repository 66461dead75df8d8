//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external collaborators.
//! All types are serializable and validate their inputs.

mod features;
mod prediction;
mod request;

pub use features::{FeatureRow, FeatureValue, ADMISSION_COLUMN, ADMISSION_TYPE, AGE_COLUMN, GENDER_COLUMN, RURAL_COLUMN};
pub use prediction::{Prediction, RiskBand};
pub use request::{Gender, PredictionRequest, Rural, DEFAULT_AGE, MAX_AGE};
