//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifact`: JSON pipeline artifact loading and evaluation
//! - `sanitize`: PII filtering for logs

pub mod artifact;
pub mod sanitize;

pub use artifact::{ArtifactError, ArtifactPipeline};
