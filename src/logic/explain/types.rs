use serde::{Deserialize, Serialize};

use crate::logic::model::DelayLabel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Post-transform feature name
    pub name: String,
    /// Transformed input value
    pub value: f64,
    /// Signed Shapley value (log-odds units)
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAttribution {
    pub label: DelayLabel,
    /// Decision score at the background reference
    pub base_value: f64,
    /// In transform output order
    pub contributions: Vec<FeatureContribution>,
}

impl LabelAttribution {
    /// base_value + Σ contributions
    pub fn decision_score(&self) -> f64 {
        self.base_value + self.contributions.iter().map(|c| c.contribution).sum::<f64>()
    }

    /// Sorted by |contribution| descending; equal magnitudes keep schema order
    pub fn ranked(&self) -> Vec<&FeatureContribution> {
        let mut ranked: Vec<_> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn get(&self, name: &str) -> Option<&FeatureContribution> {
        self.contributions.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionSet {
    pub labels: Vec<LabelAttribution>,
}

impl AttributionSet {
    pub fn get(&self, label: DelayLabel) -> Option<&LabelAttribution> {
        self.labels.iter().find(|l| l.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    /// Label predicted negative; attributions not consulted
    NoRisk,
    /// Top feature has catalogue guidance
    Cause { feature: String },
    /// Top feature has no catalogue entry
    Unspecified { feature: String },
    /// Positive prediction, nothing above threshold
    NoStandoutFactor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub label: DelayLabel,
    pub outcome: RecommendationOutcome,
    /// Cause then action, or a single fallback message
    pub messages: Vec<String>,
}
