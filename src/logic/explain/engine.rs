//! Attribution Engine - linear Shapley values per delay label
//!
//! Interventional (independent-feature) attribution for a linear model:
//! `phi_i = w_i * (x_i - E[x_i])`, computed on the pipeline's own transformed
//! row. Names come from that same transform call.

use super::types::{AttributionSet, FeatureContribution, LabelAttribution};
use crate::logic::error::PredictorError;
use crate::logic::features::FeatureVector;
use crate::logic::model::{LinearEstimator, Pipeline, TransformedRow};

pub struct AttributionEngine<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> AttributionEngine<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    pub fn explain(&self, features: &FeatureVector) -> Result<AttributionSet, PredictorError> {
        let row = self.pipeline.preprocessor().transform(features)?;

        let labels = self
            .pipeline
            .estimators()
            .iter()
            .map(|estimator| attribute(estimator, &row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AttributionSet { labels })
    }
}

/// Shapley values of one estimator at one transformed row
pub fn attribute(
    estimator: &LinearEstimator,
    row: &TransformedRow,
) -> Result<LabelAttribution, PredictorError> {
    check_alignment(estimator, row)?;

    let shifted = &row.values - &estimator.background;
    let phi = &estimator.coefficients * &shifted;

    if let Some((name, value)) = row
        .feature_names
        .iter()
        .zip(phi.iter())
        .find(|(_, v)| !v.is_finite())
    {
        return Err(PredictorError::SchemaMismatch(format!(
            "{} attribution for '{}' is not finite ({})",
            estimator.label, name, value
        )));
    }

    let contributions = row
        .feature_names
        .iter()
        .zip(row.values.iter())
        .zip(phi.iter())
        .map(|((name, &value), &contribution)| FeatureContribution {
            name: name.clone(),
            value,
            contribution,
        })
        .collect();

    Ok(LabelAttribution {
        label: estimator.label,
        base_value: estimator.expected_score(),
        contributions,
    })
}

fn check_alignment(estimator: &LinearEstimator, row: &TransformedRow) -> Result<(), PredictorError> {
    let names = row.feature_names.len();
    let values = row.values.len();
    let weights = estimator.coefficients.len();
    let background = estimator.background.len();

    if names != values || values != weights || weights != background {
        return Err(PredictorError::SchemaMismatch(format!(
            "{} attribution misaligned: {} names, {} values, {} coefficients, {} background",
            estimator.label, names, values, weights, background
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::fixtures::{fixture_artifact, redeye_vector};
    use crate::logic::model::DelayLabel;
    use ndarray::Array1;

    fn pipeline() -> Pipeline {
        Pipeline::from_artifact(&fixture_artifact()).unwrap()
    }

    #[test]
    fn test_one_attribution_per_label() {
        let pipeline = pipeline();
        let set = AttributionEngine::new(&pipeline).explain(&redeye_vector()).unwrap();

        assert_eq!(set.labels.len(), 2);
        assert_eq!(set.labels[0].label, DelayLabel::Departure);
        assert_eq!(set.labels[1].label, DelayLabel::Arrival);
        for label in &set.labels {
            assert_eq!(label.contributions.len(), pipeline.preprocessor().output_width());
        }
    }

    #[test]
    fn test_local_accuracy() {
        let pipeline = pipeline();
        let features = redeye_vector();
        let set = AttributionEngine::new(&pipeline).explain(&features).unwrap();
        let row = pipeline.preprocessor().transform(&features).unwrap();

        for attribution in &set.labels {
            let expected = pipeline.estimator(attribution.label).decision_score(&row.values);
            assert!((attribution.decision_score() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_redeye_dominates_departure() {
        let pipeline = pipeline();
        let set = AttributionEngine::new(&pipeline).explain(&redeye_vector()).unwrap();
        let departure = set.get(DelayLabel::Departure).unwrap();

        let top = departure.ranked()[0];
        assert_eq!(top.name, "is_redeye");
        assert!((top.contribution - 3.0).abs() < 1e-9);
        assert_eq!(departure.get("month_Aug").map(|c| c.contribution), Some(0.3));
    }

    #[test]
    fn test_background_shifts_contributions() {
        let mut artifact = fixture_artifact();
        let width = artifact.estimators[0].coefficients.len();
        let mut background = vec![0.0; width];
        background[6] = 2.0; // is_redeye already at the reference
        artifact.estimators[0].background_mean = Some(background);

        let pipeline = Pipeline::from_artifact(&artifact).unwrap();
        let set = AttributionEngine::new(&pipeline).explain(&redeye_vector()).unwrap();
        let departure = set.get(DelayLabel::Departure).unwrap();

        assert!(departure.get("is_redeye").unwrap().contribution.abs() < 1e-9);
        assert!((departure.base_value - (3.0 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_misaligned_row_fails_loudly() {
        let pipeline = pipeline();
        let mut row = pipeline.preprocessor().transform(&redeye_vector()).unwrap();
        row.feature_names.pop();

        let result = attribute(pipeline.estimator(DelayLabel::Departure), &row);
        assert!(matches!(result, Err(PredictorError::SchemaMismatch(_))));
    }

    #[test]
    fn test_non_finite_row_fails() {
        let pipeline = pipeline();
        let mut row = pipeline.preprocessor().transform(&redeye_vector()).unwrap();
        row.values[3] = f64::NAN;

        for label in DelayLabel::ALL {
            let result = attribute(pipeline.estimator(label), &row);
            assert!(matches!(result, Err(PredictorError::SchemaMismatch(_))), "{}", label);
        }
    }

    #[test]
    fn test_row_wider_than_estimator_fails() {
        let pipeline = pipeline();
        let mut row = pipeline.preprocessor().transform(&redeye_vector()).unwrap();
        row.feature_names.push("extra".into());
        row.values = Array1::zeros(row.feature_names.len());

        let result = attribute(pipeline.estimator(DelayLabel::Arrival), &row);
        assert!(matches!(result, Err(PredictorError::SchemaMismatch(_))));
    }
}
