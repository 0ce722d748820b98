//! Features Module - Feature Derivation Engine
//!
//! Turns a sparse flight query into the full, ordered feature vector the
//! pipeline was fit against.

pub mod calendar;
pub mod derive;
pub mod layout;
pub mod time_block;
pub mod vector;


// Re-export common types
pub use calendar::{DayOfWeek, Month};
pub use derive::FeatureDeriver;
pub use layout::{feature_index, FeatureKind, FEATURE_COUNT, FEATURE_LAYOUT};
pub use time_block::{is_redeye, TimeBlock};
pub use vector::{FeatureValue, FeatureVector, FeatureVectorBuilder};
