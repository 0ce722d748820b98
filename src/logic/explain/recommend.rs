//! Recommendation Generator
//!
//! One actionable tip per delay label: the single strongest attribution above
//! the significance threshold, mapped through a fixed message catalogue.

use serde::{Deserialize, Serialize};

use super::types::{
    AttributionSet, FeatureContribution, LabelAttribution, Recommendation, RecommendationOutcome,
};
use crate::logic::features::FeatureVector;
use crate::logic::model::{DelayLabel, PredictionResult};

/// Default |contribution| a feature must exceed to be reported
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 0.01;

pub const NO_RISK_MESSAGE: &str = "No major delay factors identified.";
pub const NO_STANDOUT_MESSAGE: &str = "Delay predicted, but no major risk factor stood out.";
pub const UNSPECIFIED_MESSAGE: &str =
    "Delay risk identified, but no specific recommendation available.";

// ============================================================================
// QUERY CONTEXT
// ============================================================================

/// Flight facts interpolated into messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub dep_hour: u8,
    pub is_redeye: bool,
    pub airline_avg_arr_delay: f64,
    pub airline_avg_dep_delay: f64,
    pub route_density: f64,
}

impl RecommendationContext {
    pub fn from_features(features: &FeatureVector) -> Self {
        let number = |name: &str| features.number(name).unwrap_or_default();
        Self {
            dep_hour: number("dep_hour") as u8,
            is_redeye: number("is_redeye") >= 1.0,
            airline_avg_arr_delay: number("airline_avg_arr_delay"),
            airline_avg_dep_delay: number("airline_avg_dep_delay"),
            route_density: number("route_density"),
        }
    }
}

// ============================================================================
// MESSAGE CATALOGUE
// ============================================================================

/// (cause, action) for a catalogued feature
pub fn catalogue_messages(feature: &str, ctx: &RecommendationContext) -> Option<(String, String)> {
    let pair = match feature {
        "dep_hour" => (
            format!(
                "Your flight's scheduled departure hour ({}:00) makes it a candidate for delay.",
                ctx.dep_hour
            ),
            "Consider booking flights earlier or later to avoid peak delay times.".to_string(),
        ),
        "is_redeye" => (
            if ctx.is_redeye {
                "Your flight is a red-eye flight, which tends to have a higher risk of delay."
                    .to_string()
            } else {
                "Your flight is not a red-eye flight, which usually helps avoid delays.".to_string()
            },
            "If possible, consider non-red-eye flights for better punctuality.".to_string(),
        ),
        "airline_avg_arr_delay" => (
            format!(
                "The airline you chose has an average arrival delay of {:.1} minutes historically.",
                ctx.airline_avg_arr_delay
            ),
            "Trying a different airline might reduce your delay risk.".to_string(),
        ),
        "airline_avg_dep_delay" => (
            format!(
                "The airline you chose has an average departure delay of {:.1} minutes historically.",
                ctx.airline_avg_dep_delay
            ),
            "Trying a different airline might reduce your delay risk.".to_string(),
        ),
        "route_density" => (
            format!(
                "This route has a traffic density score of {}, indicating heavy traffic which can increase delay chances.",
                ctx.route_density
            ),
            "Flying on less busy routes could improve your chances of on-time flights.".to_string(),
        ),
        "month_delay_score" => (
            "This month tends to experience more delays historically.".to_string(),
            "If your travel is flexible, consider off-peak months.".to_string(),
        ),
        "dow_delay_score" => (
            "Flights on this day of the week tend to be more prone to delays.".to_string(),
            "Traveling on less busy days may reduce delay risk.".to_string(),
        ),
        _ => return None,
    };
    Some(pair)
}

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationGenerator {
    pub threshold: f64,
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl RecommendationGenerator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// One recommendation per label, in output order
    pub fn recommend(
        &self,
        attributions: &AttributionSet,
        predictions: &PredictionResult,
        ctx: &RecommendationContext,
    ) -> Vec<Recommendation> {
        DelayLabel::ALL
            .iter()
            .map(|&label| {
                if !predictions.is_delayed(label) {
                    return no_risk(label);
                }
                self.recommend_delayed(label, attributions.get(label), ctx)
            })
            .collect()
    }

    fn recommend_delayed(
        &self,
        label: DelayLabel,
        attribution: Option<&LabelAttribution>,
        ctx: &RecommendationContext,
    ) -> Recommendation {
        let top = attribution.and_then(|a| self.top_feature(a));

        match top {
            None => Recommendation {
                label,
                outcome: RecommendationOutcome::NoStandoutFactor,
                messages: vec![NO_STANDOUT_MESSAGE.to_string()],
            },
            Some(feature) => match catalogue_messages(&feature.name, ctx) {
                Some((cause, action)) => Recommendation {
                    label,
                    outcome: RecommendationOutcome::Cause {
                        feature: feature.name.clone(),
                    },
                    messages: vec![cause, action],
                },
                None => Recommendation {
                    label,
                    outcome: RecommendationOutcome::Unspecified {
                        feature: feature.name.clone(),
                    },
                    messages: vec![UNSPECIFIED_MESSAGE.to_string()],
                },
            },
        }
    }

    /// Largest |contribution| above threshold; the earliest feature wins ties
    pub fn top_feature<'a>(&self, attribution: &'a LabelAttribution) -> Option<&'a FeatureContribution> {
        let mut best: Option<&FeatureContribution> = None;

        for candidate in &attribution.contributions {
            let magnitude = candidate.contribution.abs();
            if magnitude.is_nan() || magnitude <= self.threshold {
                continue;
            }
            match best {
                Some(current) if magnitude <= current.contribution.abs() => {}
                _ => best = Some(candidate),
            }
        }

        best
    }
}

fn no_risk(label: DelayLabel) -> Recommendation {
    Recommendation {
        label,
        outcome: RecommendationOutcome::NoRisk,
        messages: vec![NO_RISK_MESSAGE.to_string()],
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(name: &str, value: f64) -> FeatureContribution {
        FeatureContribution {
            name: name.to_string(),
            value: 0.0,
            contribution: value,
        }
    }

    fn attribution(label: DelayLabel, items: &[(&str, f64)]) -> LabelAttribution {
        LabelAttribution {
            label,
            base_value: 0.0,
            contributions: items.iter().map(|(n, v)| contribution(n, *v)).collect(),
        }
    }

    fn predictions(departure: bool, arrival: bool) -> PredictionResult {
        PredictionResult {
            departure_delayed: departure,
            arrival_delayed: arrival,
            ..Default::default()
        }
    }

    fn ctx() -> RecommendationContext {
        RecommendationContext {
            dep_hour: 23,
            is_redeye: true,
            airline_avg_arr_delay: 5.55,
            airline_avg_dep_delay: 9.25,
            route_density: 0.8,
        }
    }

    #[test]
    fn test_negative_label_skips_attributions() {
        // Arrival attribution missing entirely: a negative label must not need it
        let set = AttributionSet {
            labels: vec![attribution(DelayLabel::Departure, &[("is_redeye", 5.0)])],
        };
        let recs = RecommendationGenerator::default().recommend(&set, &predictions(false, false), &ctx());

        for rec in &recs {
            assert_eq!(rec.outcome, RecommendationOutcome::NoRisk);
            assert_eq!(rec.messages, vec![NO_RISK_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn test_top_feature_selected() {
        let set = AttributionSet {
            labels: vec![
                attribution(
                    DelayLabel::Departure,
                    &[("dep_hour", 0.2), ("is_redeye", -3.0), ("route_density", 0.5)],
                ),
                attribution(DelayLabel::Arrival, &[]),
            ],
        };
        let recs = RecommendationGenerator::default().recommend(&set, &predictions(true, false), &ctx());

        assert_eq!(
            recs[0].outcome,
            RecommendationOutcome::Cause { feature: "is_redeye".into() }
        );
        assert!(recs[0].messages[0].contains("red-eye"));
        assert_eq!(recs[0].messages.len(), 2);
        assert_eq!(recs[1].outcome, RecommendationOutcome::NoRisk);
    }

    #[test]
    fn test_tie_break_prefers_schema_order() {
        let generator = RecommendationGenerator::default();
        let attr = attribution(
            DelayLabel::Departure,
            &[("month_delay_score", 0.0), ("dow_delay_score", 0.7), ("route_density", -0.7)],
        );

        for _ in 0..10 {
            assert_eq!(generator.top_feature(&attr).unwrap().name, "dow_delay_score");
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let generator = RecommendationGenerator::new(0.5);
        let set = AttributionSet {
            labels: vec![
                attribution(DelayLabel::Departure, &[("dep_hour", 0.5), ("is_redeye", -0.5)]),
                attribution(DelayLabel::Arrival, &[("dep_hour", 0.51)]),
            ],
        };
        let recs = generator.recommend(&set, &predictions(true, true), &ctx());

        assert_eq!(recs[0].outcome, RecommendationOutcome::NoStandoutFactor);
        assert_eq!(recs[0].messages, vec![NO_STANDOUT_MESSAGE.to_string()]);
        assert_eq!(recs[1].outcome, RecommendationOutcome::Cause { feature: "dep_hour".into() });
        assert!(recs[1].messages[0].contains("(23:00)"));
    }

    #[test]
    fn test_uncatalogued_feature() {
        let set = AttributionSet {
            labels: vec![
                attribution(DelayLabel::Departure, &[]),
                attribution(DelayLabel::Arrival, &[("dest_ATL", 1.2), ("dep_hour", 0.3)]),
            ],
        };
        let recs = RecommendationGenerator::default().recommend(&set, &predictions(false, true), &ctx());

        assert_eq!(
            recs[1].outcome,
            RecommendationOutcome::Unspecified { feature: "dest_ATL".into() }
        );
        assert_eq!(recs[1].messages, vec![UNSPECIFIED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_catalogue_interpolation() {
        let ctx = ctx();
        let (cause, _) = catalogue_messages("airline_avg_arr_delay", &ctx).unwrap();
        assert!(cause.contains("5.5 minutes") || cause.contains("5.6 minutes"));

        let (cause, action) = catalogue_messages("route_density", &ctx).unwrap();
        assert!(cause.contains("score of 0.8"));
        assert!(action.contains("less busy routes"));

        let not_redeye = RecommendationContext { is_redeye: false, ..ctx };
        let (cause, _) = catalogue_messages("is_redeye", &not_redeye).unwrap();
        assert!(cause.contains("not a red-eye"));

        assert!(catalogue_messages("origin_EWR", &not_redeye).is_none());
    }
}
