//! Service Configuration
//!
//! Where artifacts come from and how hard to try fetching them.
//! Can be loaded from a JSON config file or from environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::error::PredictorError;
use crate::logic::explain::DEFAULT_SIGNIFICANCE_THRESHOLD;
use crate::logic::lookup::{FetchPolicy, LookupSources};
use crate::logic::model::ModelSource;

// ============================================================================
// SERVICE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// CSV files inside the artifact directory
    Local,
    /// Published tables on Google Drive
    Drive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub artifact_dir: PathBuf,
    /// Overrides `<artifact_dir>/logreg_pipeline.json`
    pub model_path: Option<PathBuf>,
    pub model_sha256: Option<String>,
    pub lookup_mode: LookupMode,
    pub fetch: FetchPolicy,
    /// Minimum |attribution| for a feature to drive a recommendation
    pub recommendation_threshold: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            artifact_dir: constants::default_artifact_dir(),
            model_path: None,
            model_sha256: None,
            lookup_mode: LookupMode::Local,
            fetch: FetchPolicy {
                timeout_secs: constants::DEFAULT_FETCH_TIMEOUT,
                max_attempts: constants::DEFAULT_FETCH_ATTEMPTS,
                backoff_ms: constants::DEFAULT_FETCH_BACKOFF_MS,
            },
            recommendation_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl ServiceConfig {
    /// All artifacts under one directory
    pub fn with_artifact_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: dir.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            artifact_dir: constants::get_artifact_dir(),
            model_path: constants::get_model_path(),
            model_sha256: constants::get_model_sha256(),
            lookup_mode: if constants::use_remote_lookups() {
                LookupMode::Drive
            } else {
                LookupMode::Local
            },
            fetch: FetchPolicy {
                timeout_secs: constants::get_fetch_timeout(),
                max_attempts: constants::get_fetch_attempts(),
                backoff_ms: constants::get_fetch_backoff_ms(),
            },
            recommendation_threshold: constants::get_recommendation_threshold()
                .unwrap_or(DEFAULT_SIGNIFICANCE_THRESHOLD),
        }
    }

    /// Load configuration from a JSON file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PredictorError::InvalidInput(format!("failed to read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PredictorError::InvalidInput(format!("failed to parse config {}: {}", path.display(), e))
        })
    }

    pub fn model_source(&self) -> ModelSource {
        let path = self
            .model_path
            .clone()
            .unwrap_or_else(|| self.artifact_dir.join(constants::PIPELINE_FILE));
        ModelSource {
            path,
            sha256: self.model_sha256.clone(),
        }
    }

    pub fn lookup_sources(&self) -> LookupSources {
        match self.lookup_mode {
            LookupMode::Local => LookupSources::local(&self.artifact_dir),
            LookupMode::Drive => LookupSources::google_drive(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::lookup::ArtifactSource;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.lookup_mode, LookupMode::Local);
        assert_eq!(config.recommendation_threshold, 0.01);
        assert_eq!(config.fetch.max_attempts, 3);
        assert!(config.model_sha256.is_none());
    }

    #[test]
    fn test_model_source_defaults_to_artifact_dir() {
        let config = ServiceConfig::with_artifact_dir("/srv/artifacts");
        assert_eq!(
            config.model_source().path,
            PathBuf::from("/srv/artifacts").join(constants::PIPELINE_FILE)
        );

        let config = ServiceConfig {
            model_path: Some(PathBuf::from("/models/p.json")),
            ..config
        };
        assert_eq!(config.model_source().path, PathBuf::from("/models/p.json"));
    }

    #[test]
    fn test_lookup_sources_by_mode() {
        let config = ServiceConfig::with_artifact_dir("/srv/artifacts");
        assert_eq!(
            config.lookup_sources().dest_cluster,
            ArtifactSource::File(PathBuf::from("/srv/artifacts").join(constants::DEST_CLUSTER_FILE))
        );

        let remote = ServiceConfig { lookup_mode: LookupMode::Drive, ..config };
        assert!(matches!(remote.lookup_sources().airline_delay, ArtifactSource::Url(_)));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "artifact_dir": "/data", "recommendation_threshold": 0.05, "lookup_mode": "drive" }"#,
        )
        .unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/data"));
        assert_eq!(config.recommendation_threshold, 0.05);
        assert_eq!(config.lookup_mode, LookupMode::Drive);
        assert_eq!(config.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_load_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ServiceConfig::load(&path).is_err());
    }
}
