//! Prediction result types.

use serde::{Deserialize, Serialize};

/// Coarse risk classification for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    /// Below 30% predicted risk
    Low,
    /// 30-70% predicted risk
    Elevated,
    /// Above 70% predicted risk
    High,
}

impl RiskBand {
    /// Classify a positive-class probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            Self::Low
        } else if probability < 0.7 {
            Self::Elevated
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Elevated => "Elevated risk - Follow-up recommended",
            Self::High => "High risk - Immediate consultation advised",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Elevated => write!(f, "ELEVATED"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// A single mortality-risk prediction. Displayed once and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Positive-class (mortality) probability, in [0, 1]
    pub probability: f64,

    /// Display band derived from the probability
    pub band: RiskBand,

    /// Timestamp of the prediction
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    /// Wrap a positive-class probability.
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            band: RiskBand::from_probability(probability),
            created_at: chrono::Utc::now(),
        }
    }

    /// The single output line shown to the user.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Predicted mortality risk: {:.2}%",
            self.probability * 100.0
        )
    }
}
