//! Inference Engine - Prediction Service
//!
//! Loads the pipeline artifact once (lazy, thread-safe) and runs predictions.
//! A missing, corrupt or mismatched artifact is reported, never replaced by
//! a default prediction.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::label::DelayLabel;
use super::pipeline::Pipeline;
use crate::logic::error::PredictorError;
use crate::logic::features::FeatureVector;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PredictionResult {
    pub departure_delayed: bool,
    pub arrival_delayed: bool,
    pub departure_probability: f64, // 0.0 - 1.0
    pub arrival_probability: f64,   // 0.0 - 1.0
    pub inference_time_us: u64,     // Microseconds
}

impl PredictionResult {
    pub fn is_delayed(&self, label: DelayLabel) -> bool {
        match label {
            DelayLabel::Departure => self.departure_delayed,
            DelayLabel::Arrival => self.arrival_delayed,
        }
    }

    pub fn probability(&self, label: DelayLabel) -> f64 {
        match label {
            DelayLabel::Departure => self.departure_probability,
            DelayLabel::Arrival => self.arrival_probability,
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub sha256: String,
    pub transformed_features: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Engine Status for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

/// Where the pipeline artifact lives and what it must hash to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSource {
    pub path: PathBuf,
    /// Expected SHA-256 (hex); verification skipped when absent
    #[serde(default)]
    pub sha256: Option<String>,
}

impl ModelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sha256: None,
        }
    }

    pub fn with_checksum(mut self, sha256: impl Into<String>) -> Self {
        self.sha256 = Some(sha256.into());
        self
    }
}

struct LoadedModel {
    pipeline: Arc<Pipeline>,
    metadata: ModelMetadata,
}

// ============================================================================
// LOADING
// ============================================================================

/// Hex SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Read, verify and parse a pipeline artifact from disk
pub fn load_pipeline(source: &ModelSource) -> Result<(Pipeline, ModelMetadata), PredictorError> {
    log::info!("Loading pipeline from: {}", source.path.display());

    let bytes = read_artifact(&source.path)?;
    let digest = sha256_hex(&bytes);

    if let Some(expected) = &source.sha256 {
        if !expected.trim().eq_ignore_ascii_case(&digest) {
            return Err(PredictorError::ModelUnavailable(format!(
                "checksum mismatch for {}: expected {}, got {}",
                source.path.display(),
                expected,
                digest
            )));
        }
    }

    let pipeline = Pipeline::from_json(&bytes)?;
    let metadata = ModelMetadata {
        model_path: source.path.display().to_string(),
        sha256: digest,
        transformed_features: pipeline.preprocessor().output_width(),
        loaded_at: chrono::Utc::now(),
    };

    log::info!(
        "Pipeline loaded ({} transformed features)",
        metadata.transformed_features
    );

    Ok((pipeline, metadata))
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, PredictorError> {
    if !path.exists() {
        return Err(PredictorError::ModelUnavailable(format!(
            "model not found: {}",
            path.display()
        )));
    }
    std::fs::read(path).map_err(|e| {
        PredictorError::ModelUnavailable(format!("failed to read {}: {}", path.display(), e))
    })
}

// ============================================================================
// PREDICTION SERVICE
// ============================================================================

/// Lazily loads the pipeline exactly once; concurrent first callers block on
/// the same initialization instead of loading twice.
pub struct PredictionService {
    source: ModelSource,
    model: OnceCell<LoadedModel>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl PredictionService {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            model: OnceCell::new(),
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Service around an already-built pipeline
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        let metadata = ModelMetadata {
            model_path: "<memory>".to_string(),
            sha256: String::new(),
            transformed_features: pipeline.preprocessor().output_width(),
            loaded_at: chrono::Utc::now(),
        };
        let service = Self::new(ModelSource::new("<memory>"));
        let _ = service.model.set(LoadedModel {
            pipeline: Arc::new(pipeline),
            metadata,
        });
        service
    }

    fn loaded(&self) -> Result<&LoadedModel, PredictorError> {
        self.model.get_or_try_init(|| {
            let (pipeline, metadata) = load_pipeline(&self.source)?;
            Ok(LoadedModel {
                pipeline: Arc::new(pipeline),
                metadata,
            })
        })
    }

    /// Shared handle to the loaded pipeline (loads on first use)
    pub fn pipeline(&self) -> Result<Arc<Pipeline>, PredictorError> {
        self.loaded().map(|m| Arc::clone(&m.pipeline))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        self.model.get().map(|m| m.metadata.clone())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictorError> {
        let start_time = std::time::Instant::now();

        let mut result = self.loaded()?.pipeline.predict(features)?;

        result.inference_time_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(result.inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        log::debug!(
            "Prediction: departure={} ({:.3}), arrival={} ({:.3}) in {}us",
            result.departure_delayed,
            result.departure_probability,
            result.arrival_delayed,
            result.arrival_probability,
            result.inference_time_us
        );

        Ok(result)
    }

    pub fn status(&self) -> EngineStatus {
        let (loaded, name) = match self.model.get() {
            Some(m) => (true, m.metadata.model_path.clone()),
            None => (false, "None".to_string()),
        };

        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: loaded,
            model_name: name,
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
