//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The pipeline artifact is fit against exactly this field list, in this order.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//! 4. Change a feature kind → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::PredictorError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// How the preprocessing stage treats a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// String category, one-hot encoded downstream
    Categorical,
    /// Scalar, scaled or passed through downstream
    Numeric,
}

impl FeatureKind {
    fn tag(&self) -> u8 {
        match self {
            FeatureKind::Categorical => b'c',
            FeatureKind::Numeric => b'n',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub kind: FeatureKind,
}

const fn cat(name: &'static str) -> FeatureSpec {
    FeatureSpec { name, kind: FeatureKind::Categorical }
}

const fn num(name: &'static str) -> FeatureSpec {
    FeatureSpec { name, kind: FeatureKind::Numeric }
}

/// Feature names in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const FEATURE_LAYOUT: &[FeatureSpec] = &[
    // === Raw query fields (0-2) ===
    cat("month"),                  // 0: Three-letter month code
    cat("day_of_week"),            // 1: Three-letter day code
    num("dep_hour"),               // 2: Scheduled departure hour 0-23

    // === Route tokens (3-4) ===
    cat("origin"),                 // 3: Origin airport
    cat("dest"),                   // 4: Destination airport

    // === Lookup features (5-9) ===
    num("airline_avg_arr_delay"),  // 5: Airline historical arrival delay (min)
    num("airline_avg_dep_delay"),  // 6: Airline historical departure delay (min)
    num("route_density"),          // 7: Route traffic density score
    num("dest_cluster"),           // 8: Destination airport cluster id
    num("route_cluster"),          // 9: Route cluster id

    // === Derived (10-13) ===
    num("is_redeye"),              // 10: 1 if departing 22:00-05:59
    num("time_block_score"),       // 11: Time-of-day delay ordinal
    num("month_delay_score"),      // 12: Month delay ordinal
    num("dow_delay_score"),        // 13: Day-of-week delay ordinal
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 14;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for spec in FEATURE_LAYOUT {
        hasher.update(spec.name.as_bytes());
        hasher.update(&[spec.kind.tag()]);
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), PredictorError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(PredictorError::SchemaMismatch(format!(
            "feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            FEATURE_VERSION, current_hash, incoming_version, incoming_hash
        )));
    }

    Ok(())
}

/// Validate a fitted column list against the layout (names AND order)
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), PredictorError> {
    if columns.len() != FEATURE_COUNT {
        return Err(PredictorError::SchemaMismatch(format!(
            "expected {} input features, pipeline declares {}",
            FEATURE_COUNT,
            columns.len()
        )));
    }

    for (i, (spec, column)) in FEATURE_LAYOUT.iter().zip(columns).enumerate() {
        if spec.name != column.as_ref() {
            return Err(PredictorError::SchemaMismatch(format!(
                "feature {} should be '{}', pipeline declares '{}'",
                i,
                spec.name,
                column.as_ref()
            )));
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|s| s.name == name)
}

pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURE_LAYOUT.iter().map(|s| s.name)
}

// ============================================================================
// TESTS
// ============================================================================
