//! Model Module - Prediction Service
//!
//! Pipeline artifact loading, preprocessing and the two delay estimators.

pub mod inference;
pub mod label;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export common types
pub use inference::{EngineStatus, ModelMetadata, ModelSource, PredictionResult, PredictionService};
pub use label::DelayLabel;
pub use pipeline::{LinearEstimator, Pipeline, PipelineArtifact, Preprocessor, TransformedRow};
