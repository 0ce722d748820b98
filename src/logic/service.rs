//! Flight Delay Service - one entry point for a whole assessment
//!
//! Owns the lookup store and prediction service. Both are loaded once
//! (on `warm_up` or the first request) and shared read-only afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use uuid::Uuid;

use super::config::ServiceConfig;
use super::error::PredictorError;
use super::explain::{
    AttributionEngine, AttributionSet, Recommendation, RecommendationContext,
    RecommendationGenerator,
};
use super::features::{FeatureDeriver, FeatureVector, TimeBlock};
use super::lookup::LookupStore;
use super::model::{EngineStatus, Pipeline, PredictionResult, PredictionService};
use super::query::FlightQuery;

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Everything produced for one flight query
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub request_id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub query: FlightQuery,
    pub time_block: TimeBlock,
    pub time_block_label: &'static str,
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub attributions: AttributionSet,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct FlightDelayService {
    config: ServiceConfig,
    lookups: OnceCell<LookupStore>,
    model: PredictionService,
    recommender: RecommendationGenerator,
}

impl FlightDelayService {
    pub fn new(config: ServiceConfig) -> Self {
        let model = PredictionService::new(config.model_source());
        let recommender = RecommendationGenerator::new(config.recommendation_threshold);
        Self {
            config,
            lookups: OnceCell::new(),
            model,
            recommender,
        }
    }

    /// Service over already-loaded components
    pub fn with_components(lookups: LookupStore, pipeline: Pipeline, threshold: f64) -> Self {
        let config = ServiceConfig {
            recommendation_threshold: threshold,
            ..Default::default()
        };
        Self {
            config,
            lookups: OnceCell::with_value(lookups),
            model: PredictionService::with_pipeline(pipeline),
            recommender: RecommendationGenerator::new(threshold),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Load every artifact now; any failure here is fatal
    pub fn warm_up(&self) -> Result<(), PredictorError> {
        let lookups = self.lookups()?;
        let pipeline = self.model.pipeline()?;
        log::info!(
            "Service ready: {} airlines, {} routes, {} transformed features",
            lookups.airlines().len(),
            lookups.routes().len(),
            pipeline.preprocessor().output_width()
        );
        Ok(())
    }

    pub fn lookups(&self) -> Result<&LookupStore, PredictorError> {
        self.lookups.get_or_try_init(|| {
            let sources = self.config.lookup_sources();
            LookupStore::load(&sources, &self.config.fetch)
        })
    }

    pub fn pipeline(&self) -> Result<Arc<Pipeline>, PredictorError> {
        self.model.pipeline()
    }

    pub fn derive(&self, query: &FlightQuery) -> Result<FeatureVector, PredictorError> {
        FeatureDeriver::new(self.lookups()?).derive(query)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictorError> {
        self.model.predict(features)
    }

    pub fn explain(&self, features: &FeatureVector) -> Result<AttributionSet, PredictorError> {
        let pipeline = self.model.pipeline()?;
        AttributionEngine::new(&pipeline).explain(features)
    }

    pub fn recommend(
        &self,
        attributions: &AttributionSet,
        prediction: &PredictionResult,
        features: &FeatureVector,
    ) -> Vec<Recommendation> {
        let ctx = RecommendationContext::from_features(features);
        self.recommender.recommend(attributions, prediction, &ctx)
    }

    /// Derive, predict, attribute and recommend for one query
    pub fn assess(&self, query: &FlightQuery) -> Result<Assessment, PredictorError> {
        let request_id = Uuid::new_v4();

        let features = self.derive(query)?;
        log::debug!("[{}] features: {}", request_id, features.to_log_entry());

        let prediction = self.predict(&features)?;
        let attributions = self.explain(&features)?;
        let recommendations = self.recommend(&attributions, &prediction, &features);

        let time_block = TimeBlock::from_hour(query.dep_hour()).ok_or_else(|| {
            PredictorError::InvalidInput(format!("departure hour {} outside 0-23", query.dep_hour()))
        })?;

        log::info!(
            "[{}] {} {}: departure={} arrival={}",
            request_id,
            query.airline(),
            query.route(),
            prediction.departure_delayed,
            prediction.arrival_delayed
        );

        Ok(Assessment {
            request_id,
            assessed_at: Utc::now(),
            query: query.clone(),
            time_block,
            time_block_label: time_block.label(),
            features,
            prediction,
            attributions,
            recommendations,
        })
    }

    pub fn status(&self) -> EngineStatus {
        self.model.status()
    }
}
