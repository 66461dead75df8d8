//! Application layer: The prediction use case.

mod predictor;

pub use predictor::PredictionService;
