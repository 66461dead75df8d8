//! Prediction request types.
//!
//! The three raw fields the form collects. Enum wire forms match the values
//! of the admission training dataset (`"MALE"`, `"YES"`, ...), which is also
//! how they appear inside the trained pipeline's categorical columns.

use serde::{Deserialize, Serialize};

/// Upper bound on the age field (years).
pub const MAX_AGE: u32 = 120;

/// Initial value of the age field in the form.
pub const DEFAULT_AGE: u32 = 60;

/// Patient gender as the pipeline was trained on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The categorical value fed to the pipeline.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }

    /// Flip to the other variant (used by the form toggle).
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" | "M" => Ok(Self::Male),
            "FEMALE" | "F" => Ok(Self::Female),
            other => Err(format!("Unknown gender {other:?} (expected MALE or FEMALE)")),
        }
    }
}

/// Rural/urban residence status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rural {
    Yes,
    No,
}

impl Rural {
    /// The categorical value fed to the pipeline.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    /// Flip to the other variant (used by the form toggle).
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl std::fmt::Display for Rural {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rural {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" | "Y" => Ok(Self::Yes),
            "NO" | "N" => Ok(Self::No),
            other => Err(format!("Unknown rural status {other:?} (expected YES or NO)")),
        }
    }
}

/// A single prediction request. Supplied by the caller at request time and
/// never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Age in years (0-120)
    pub age: u32,

    /// Patient gender
    pub gender: Gender,

    /// Rural residence
    pub rural: Rural,
}

impl PredictionRequest {
    /// Create a new request with the given fields.
    #[must_use]
    pub fn new(age: u32, gender: Gender, rural: Rural) -> Self {
        Self { age, gender, rural }
    }

    /// Validate the request fields.
    ///
    /// # Errors
    /// Returns a message if the age is outside the form's range.
    pub fn validate(&self) -> Result<(), String> {
        if self.age > MAX_AGE {
            return Err(format!("Age {} out of range [0, {MAX_AGE}]", self.age));
        }
        Ok(())
    }
}

impl Default for PredictionRequest {
    /// The form's initial values: 60-year-old male, non-rural.
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            gender: Gender::Male,
            rural: Rural::No,
        }
    }
}
