//! Explain Module - attributions and recommendations
//!
//! - `engine` - linear Shapley attribution per delay label
//! - `recommend` - thresholded top-feature advice

pub mod engine;
pub mod recommend;
pub mod types;

pub use engine::AttributionEngine;
pub use recommend::{
    RecommendationContext, RecommendationGenerator, DEFAULT_SIGNIFICANCE_THRESHOLD,
    NO_RISK_MESSAGE, NO_STANDOUT_MESSAGE, UNSPECIFIED_MESSAGE,
};
pub use types::{
    AttributionSet, FeatureContribution, LabelAttribution, Recommendation, RecommendationOutcome,
};
