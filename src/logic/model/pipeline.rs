//! Classification Pipeline - preprocessing + two linear estimators
//!
//! The artifact is a JSON export of the fitted pipeline:
//! a column transformer (standard scaling / one-hot / passthrough) followed by
//! one binary linear estimator per delay label.
//!
//! The transform emits feature names and values in the same pass, so
//! attribution can never pair a score with the wrong name.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::inference::PredictionResult;
use super::label::DelayLabel;
use crate::logic::error::PredictorError;
use crate::logic::features::layout::{
    feature_index, layout_hash, validate_columns, FEATURE_VERSION,
};
use crate::logic::features::{FeatureValue, FeatureVector};

/// Artifact format understood by this loader
pub const PIPELINE_FORMAT_VERSION: u32 = 1;

// ============================================================================
// ARTIFACT (serialized form)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    /// Feature layout the pipeline was fit against (optional stamp)
    #[serde(default)]
    pub feature_version: Option<u8>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
    /// Input columns, in fit order
    pub input_features: Vec<String>,
    pub preprocessor: Vec<ColumnTransform>,
    pub estimators: Vec<EstimatorArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    StandardScaler {
        name: String,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHotEncoder {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
    },
    Passthrough {
        name: String,
        columns: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorArtifact {
    pub label: DelayLabel,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Expected transformed input, used as the attribution reference.
    /// Absent means the standardized center (all zeros).
    #[serde(default)]
    pub background_mean: Option<Vec<f64>>,
}

// ============================================================================
// COMPILED PREPROCESSOR
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Scale {
        columns: Vec<(usize, String)>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        columns: Vec<(usize, String)>,
        categories: Vec<Vec<String>>,
    },
    Passthrough {
        columns: Vec<(usize, String)>,
    },
}

/// Single transformed row with its feature names, produced together
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRow {
    pub feature_names: Vec<String>,
    pub values: Array1<f64>,
}

impl TransformedRow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    steps: Vec<Step>,
    output_width: usize,
}

impl Preprocessor {
    fn compile(transforms: &[ColumnTransform]) -> Result<Self, PredictorError> {
        let mut steps = Vec::with_capacity(transforms.len());
        let mut output_width = 0;

        for transform in transforms {
            match transform {
                ColumnTransform::StandardScaler { name, columns, mean, scale } => {
                    if mean.len() != columns.len() || scale.len() != columns.len() {
                        return Err(PredictorError::ModelUnavailable(format!(
                            "scaler '{}' has {} columns but {} means / {} scales",
                            name,
                            columns.len(),
                            mean.len(),
                            scale.len()
                        )));
                    }
                    ensure_finite(name, "mean", mean)?;
                    ensure_finite(name, "scale", scale)?;
                    // Zero variance columns are left unscaled
                    let scale = scale.iter().map(|&s| if s == 0.0 { 1.0 } else { s }).collect();
                    output_width += columns.len();
                    steps.push(Step::Scale {
                        columns: resolve_columns(name, columns)?,
                        mean: mean.clone(),
                        scale,
                    });
                }
                ColumnTransform::OneHotEncoder { name, columns, categories } => {
                    if categories.len() != columns.len() {
                        return Err(PredictorError::ModelUnavailable(format!(
                            "encoder '{}' has {} columns but {} category lists",
                            name,
                            columns.len(),
                            categories.len()
                        )));
                    }
                    output_width += categories.iter().map(Vec::len).sum::<usize>();
                    steps.push(Step::OneHot {
                        columns: resolve_columns(name, columns)?,
                        categories: categories.clone(),
                    });
                }
                ColumnTransform::Passthrough { name, columns } => {
                    output_width += columns.len();
                    steps.push(Step::Passthrough {
                        columns: resolve_columns(name, columns)?,
                    });
                }
            }
        }

        Ok(Self { steps, output_width })
    }

    /// Number of post-transform features
    pub fn output_width(&self) -> usize {
        self.output_width
    }

    /// Transform one feature vector into the estimator input space
    pub fn transform(&self, features: &FeatureVector) -> Result<TransformedRow, PredictorError> {
        features.validate()?;

        let mut names = Vec::with_capacity(self.output_width);
        let mut values = Vec::with_capacity(self.output_width);

        for step in &self.steps {
            match step {
                Step::Scale { columns, mean, scale } => {
                    for (i, (index, column)) in columns.iter().enumerate() {
                        let x = numeric_at(features, *index, column)?;
                        names.push(column.clone());
                        values.push((x - mean[i]) / scale[i]);
                    }
                }
                Step::OneHot { columns, categories } => {
                    for ((index, column), known) in columns.iter().zip(categories) {
                        let key = category_key(features.get(*index), column)?;
                        if !known.iter().any(|c| *c == key) {
                            log::debug!("Unseen category '{}' for '{}', encoded as all zeros", key, column);
                        }
                        for category in known {
                            names.push(format!("{}_{}", column, category));
                            values.push(if *category == key { 1.0 } else { 0.0 });
                        }
                    }
                }
                Step::Passthrough { columns } => {
                    for (index, column) in columns {
                        names.push(column.clone());
                        values.push(numeric_at(features, *index, column)?);
                    }
                }
            }
        }

        if names.len() != self.output_width || values.len() != self.output_width {
            return Err(PredictorError::SchemaMismatch(format!(
                "transform produced {} names / {} values, expected {}",
                names.len(),
                values.len(),
                self.output_width
            )));
        }

        if let Some((name, value)) = names.iter().zip(&values).find(|(_, v)| !v.is_finite()) {
            return Err(PredictorError::SchemaMismatch(format!(
                "transformed feature '{}' is not finite ({})",
                name, value
            )));
        }

        Ok(TransformedRow {
            feature_names: names,
            values: Array1::from(values),
        })
    }
}

fn ensure_finite(owner: &str, field: &str, values: &[f64]) -> Result<(), PredictorError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(PredictorError::ModelUnavailable(format!(
            "'{}' {}[{}] is not finite ({})",
            owner, field, i, values[i]
        ))),
        None => Ok(()),
    }
}

fn resolve_columns(step: &str, columns: &[String]) -> Result<Vec<(usize, String)>, PredictorError> {
    columns
        .iter()
        .map(|column| {
            feature_index(column)
                .map(|i| (i, column.clone()))
                .ok_or_else(|| {
                    PredictorError::SchemaMismatch(format!(
                        "transformer '{}' references unknown column '{}'",
                        step, column
                    ))
                })
        })
        .collect()
}

fn numeric_at(features: &FeatureVector, index: usize, column: &str) -> Result<f64, PredictorError> {
    features
        .get(index)
        .and_then(FeatureValue::as_number)
        .ok_or_else(|| PredictorError::SchemaMismatch(format!("column '{}' is not numeric", column)))
}

fn category_key(value: Option<&FeatureValue>, column: &str) -> Result<String, PredictorError> {
    match value {
        Some(FeatureValue::Text(s)) => Ok(s.clone()),
        Some(FeatureValue::Number(v)) if v.fract() == 0.0 => Ok(format!("{}", *v as i64)),
        Some(FeatureValue::Number(v)) => Ok(v.to_string()),
        None => Err(PredictorError::SchemaMismatch(format!("column '{}' missing", column))),
    }
}

// ============================================================================
// LINEAR ESTIMATOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct LinearEstimator {
    pub label: DelayLabel,
    pub coefficients: Array1<f64>,
    pub intercept: f64,
    pub background: Array1<f64>,
}

impl LinearEstimator {
    fn compile(artifact: &EstimatorArtifact, width: usize) -> Result<Self, PredictorError> {
        if artifact.coefficients.len() != width {
            return Err(PredictorError::ModelUnavailable(format!(
                "{} estimator has {} coefficients, preprocessor emits {} features",
                artifact.label,
                artifact.coefficients.len(),
                width
            )));
        }

        let owner = format!("{} estimator", artifact.label);
        ensure_finite(&owner, "coefficients", &artifact.coefficients)?;
        ensure_finite(&owner, "intercept", &[artifact.intercept])?;
        if let Some(mean) = &artifact.background_mean {
            ensure_finite(&owner, "background_mean", mean)?;
        }

        let background = match &artifact.background_mean {
            Some(mean) if mean.len() != width => {
                return Err(PredictorError::ModelUnavailable(format!(
                    "{} estimator background has {} values, expected {}",
                    artifact.label,
                    mean.len(),
                    width
                )));
            }
            Some(mean) => Array1::from(mean.clone()),
            None => Array1::zeros(width),
        };

        Ok(Self {
            label: artifact.label,
            coefficients: Array1::from(artifact.coefficients.clone()),
            intercept: artifact.intercept,
            background,
        })
    }

    /// Signed distance to the decision boundary (log-odds)
    pub fn decision_score(&self, x: &Array1<f64>) -> f64 {
        self.coefficients.dot(x) + self.intercept
    }

    /// Decision score at the background reference
    pub fn expected_score(&self) -> f64 {
        self.decision_score(&self.background)
    }
}

/// Decision score that refuses to turn NaN/inf into a "not delayed" verdict
fn finite_score(estimator: &LinearEstimator, x: &Array1<f64>) -> Result<f64, PredictorError> {
    let score = estimator.decision_score(x);
    if !score.is_finite() {
        return Err(PredictorError::SchemaMismatch(format!(
            "{} decision score is not finite ({})",
            estimator.label, score
        )));
    }
    Ok(score)
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Pipeline {
    preprocessor: Preprocessor,
    departure: LinearEstimator,
    arrival: LinearEstimator,
}

impl Pipeline {
    pub fn from_artifact(artifact: &PipelineArtifact) -> Result<Self, PredictorError> {
        if artifact.format_version != PIPELINE_FORMAT_VERSION {
            return Err(PredictorError::ModelUnavailable(format!(
                "unsupported pipeline format v{} (expected v{})",
                artifact.format_version, PIPELINE_FORMAT_VERSION
            )));
        }

        validate_columns(&artifact.input_features)?;

        if let Some(version) = artifact.feature_version {
            if version != FEATURE_VERSION {
                return Err(PredictorError::SchemaMismatch(format!(
                    "pipeline fit on feature layout v{}, engine uses v{}",
                    version, FEATURE_VERSION
                )));
            }
        }
        if let Some(hash) = artifact.layout_hash {
            if hash != layout_hash() {
                return Err(PredictorError::SchemaMismatch(format!(
                    "pipeline layout hash {:08x} != engine layout hash {:08x}",
                    hash,
                    layout_hash()
                )));
            }
        }

        let preprocessor = Preprocessor::compile(&artifact.preprocessor)?;
        let width = preprocessor.output_width();

        let estimator = |label: DelayLabel| -> Result<LinearEstimator, PredictorError> {
            let mut matching = artifact.estimators.iter().filter(|e| e.label == label);
            let found = matching.next().ok_or_else(|| {
                PredictorError::ModelUnavailable(format!("no estimator for {}", label))
            })?;
            if matching.next().is_some() {
                return Err(PredictorError::ModelUnavailable(format!(
                    "duplicate estimators for {}",
                    label
                )));
            }
            LinearEstimator::compile(found, width)
        };

        Ok(Self {
            departure: estimator(DelayLabel::Departure)?,
            arrival: estimator(DelayLabel::Arrival)?,
            preprocessor,
        })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, PredictorError> {
        let artifact: PipelineArtifact = serde_json::from_slice(bytes)
            .map_err(|e| PredictorError::ModelUnavailable(format!("corrupt pipeline artifact: {}", e)))?;
        Self::from_artifact(&artifact)
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn estimator(&self, label: DelayLabel) -> &LinearEstimator {
        match label {
            DelayLabel::Departure => &self.departure,
            DelayLabel::Arrival => &self.arrival,
        }
    }

    /// Estimators in output order (departure, arrival)
    pub fn estimators(&self) -> [&LinearEstimator; 2] {
        [&self.departure, &self.arrival]
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictorError> {
        let row = self.preprocessor.transform(features)?;

        let departure = finite_score(&self.departure, &row.values)?;
        let arrival = finite_score(&self.arrival, &row.values)?;

        Ok(PredictionResult {
            departure_delayed: departure > 0.0,
            arrival_delayed: arrival > 0.0,
            departure_probability: sigmoid(departure),
            arrival_probability: sigmoid(arrival),
            inference_time_us: 0,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
