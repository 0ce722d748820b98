//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Values can only be assembled through `FeatureVectorBuilder`, which refuses
//! to build unless every layout field is set with the right kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout::{
    feature_index, layout_hash, validate_layout, FeatureKind, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};
use crate::logic::error::PredictorError;

// ============================================================================
// FEATURE VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Number(_) => FeatureKind::Numeric,
            FeatureValue::Text(_) => FeatureKind::Categorical,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(v) => write!(f, "{}", v),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    pub fn builder() -> FeatureVectorBuilder {
        FeatureVectorBuilder::new()
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<&FeatureValue> {
        self.values.get(index)
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<&FeatureValue> {
        feature_index(name).and_then(|i| self.get(i))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get_by_name(name).and_then(FeatureValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get_by_name(name).and_then(FeatureValue::as_text)
    }

    /// (name, value) pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        FEATURE_LAYOUT.iter().map(|s| s.name).zip(self.values.iter())
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), PredictorError> {
        validate_layout(self.version, self.layout_hash)?;
        if self.values.len() != FEATURE_COUNT {
            return Err(PredictorError::SchemaMismatch(format!(
                "feature vector has {} values, layout expects {}",
                self.values.len(),
                FEATURE_COUNT
            )));
        }
        for (spec, value) in FEATURE_LAYOUT.iter().zip(&self.values) {
            if spec.kind != value.kind() {
                return Err(PredictorError::SchemaMismatch(format!(
                    "feature '{}' expects {:?}, got {:?}",
                    spec.name,
                    spec.kind,
                    value.kind()
                )));
            }
        }
        Ok(())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": self.iter()
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector with named setters
#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    slots: Vec<Option<FeatureValue>>,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self { slots: vec![None; FEATURE_COUNT] }
    }

    // Raw query fields
    pub fn month(self, code: &str) -> Self {
        self.text("month", code)
    }

    pub fn day_of_week(self, code: &str) -> Self {
        self.text("day_of_week", code)
    }

    pub fn dep_hour(self, hour: u8) -> Self {
        self.number("dep_hour", f64::from(hour))
    }

    // Route tokens
    pub fn origin(self, origin: &str) -> Self {
        self.text("origin", origin)
    }

    pub fn dest(self, dest: &str) -> Self {
        self.text("dest", dest)
    }

    // Lookup features
    pub fn airline_avg_arr_delay(self, minutes: f64) -> Self {
        self.number("airline_avg_arr_delay", minutes)
    }

    pub fn airline_avg_dep_delay(self, minutes: f64) -> Self {
        self.number("airline_avg_dep_delay", minutes)
    }

    pub fn route_density(self, density: f64) -> Self {
        self.number("route_density", density)
    }

    pub fn dest_cluster(self, cluster: i64) -> Self {
        self.number("dest_cluster", cluster as f64)
    }

    pub fn route_cluster(self, cluster: i64) -> Self {
        self.number("route_cluster", cluster as f64)
    }

    // Derived features
    pub fn is_redeye(self, redeye: bool) -> Self {
        self.number("is_redeye", if redeye { 1.0 } else { 0.0 })
    }

    pub fn time_block_score(self, score: u8) -> Self {
        self.number("time_block_score", f64::from(score))
    }

    pub fn month_delay_score(self, score: u8) -> Self {
        self.number("month_delay_score", f64::from(score))
    }

    pub fn dow_delay_score(self, score: u8) -> Self {
        self.number("dow_delay_score", f64::from(score))
    }

    /// Set feature by name dynamically (unknown names are ignored, caught at build)
    pub fn set(mut self, name: &str, value: FeatureValue) -> Self {
        if let Some(index) = feature_index(name) {
            self.slots[index] = Some(value);
        }
        self
    }

    fn number(self, name: &str, value: f64) -> Self {
        self.set(name, FeatureValue::Number(value))
    }

    fn text(self, name: &str, value: &str) -> Self {
        self.set(name, FeatureValue::Text(value.to_string()))
    }

    /// Fails if any field is unset or holds the wrong kind
    pub fn build(self) -> Result<FeatureVector, PredictorError> {
        let mut values = Vec::with_capacity(FEATURE_COUNT);

        for (spec, slot) in FEATURE_LAYOUT.iter().zip(self.slots) {
            let value = slot.ok_or_else(|| {
                PredictorError::SchemaMismatch(format!("feature '{}' was never set", spec.name))
            })?;
            if value.kind() != spec.kind {
                return Err(PredictorError::SchemaMismatch(format!(
                    "feature '{}' expects {:?}, got {:?}",
                    spec.name,
                    spec.kind,
                    value.kind()
                )));
            }
            values.push(value);
        }

        Ok(FeatureVector {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        })
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
