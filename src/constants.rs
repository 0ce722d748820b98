//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden through a `FLIGHT_DELAY_*` environment variable.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "flight-delay";

// ============================================
// Artifact names
// ============================================

pub const PIPELINE_FILE: &str = "logreg_pipeline.json";
pub const AIRLINE_DELAY_FILE: &str = "airline_delay_lookup.csv";
pub const ROUTE_DENSITY_FILE: &str = "route_density_lookup.csv";
pub const DEST_CLUSTER_FILE: &str = "dest_cluster_lookup.csv";
pub const ROUTE_CLUSTER_FILE: &str = "route_cluster_lookup.csv";

// ============================================
// Published lookup tables (Google Drive file ids)
// ============================================

pub const GOOGLE_DRIVE_BASE_URL: &str = "https://drive.google.com/uc?id=";
pub const AIRLINE_DELAY_FILE_ID: &str = "1ed2CeYXgwrWEc-aecGBfwRTBbR-Rkilu";
pub const ROUTE_DENSITY_FILE_ID: &str = "1-1LadBkeEYEsCfC6LdK1Ssv89Hthhxls";
pub const DEST_CLUSTER_FILE_ID: &str = "17DMA5-fWipMqQPGCNYD_cXIIuIphTB8Y";
pub const ROUTE_CLUSTER_FILE_ID: &str = "1H8I0YOC6zIIHARBIkumuxcVe0njoo04g";

// ============================================
// Fetch defaults
// ============================================

/// Per-attempt artifact fetch timeout (seconds)
pub const DEFAULT_FETCH_TIMEOUT: u64 = 30;

/// Attempts before an artifact fetch is fatal
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

/// Initial pause between attempts (milliseconds)
pub const DEFAULT_FETCH_BACKOFF_MS: u64 = 500;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Directory holding the pipeline and lookup artifacts
pub fn get_artifact_dir() -> PathBuf {
    std::env::var("FLIGHT_DELAY_ARTIFACT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_artifact_dir())
}

pub fn default_artifact_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// JSON config file replacing the env-derived config, if set
pub fn get_config_path() -> Option<PathBuf> {
    std::env::var("FLIGHT_DELAY_CONFIG").ok().map(PathBuf::from)
}

/// Explicit pipeline path, if set
pub fn get_model_path() -> Option<PathBuf> {
    std::env::var("FLIGHT_DELAY_MODEL_PATH").ok().map(PathBuf::from)
}

/// Expected pipeline SHA-256, if set
pub fn get_model_sha256() -> Option<String> {
    std::env::var("FLIGHT_DELAY_MODEL_SHA256")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Read lookup tables from Google Drive instead of the artifact dir
pub fn use_remote_lookups() -> bool {
    std::env::var("FLIGHT_DELAY_LOOKUP_SOURCE")
        .map(|s| s.eq_ignore_ascii_case("drive"))
        .unwrap_or(false)
}

pub fn get_fetch_timeout() -> u64 {
    std::env::var("FLIGHT_DELAY_FETCH_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FETCH_TIMEOUT)
}

pub fn get_fetch_attempts() -> u32 {
    std::env::var("FLIGHT_DELAY_FETCH_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FETCH_ATTEMPTS)
}

pub fn get_fetch_backoff_ms() -> u64 {
    std::env::var("FLIGHT_DELAY_FETCH_BACKOFF_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FETCH_BACKOFF_MS)
}

/// Significance threshold for recommendations
pub fn get_recommendation_threshold() -> Option<f64> {
    std::env::var("FLIGHT_DELAY_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
}
