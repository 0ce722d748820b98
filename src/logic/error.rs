//! Error taxonomy for the prediction core
//!
//! Unknown lookup keys are never errors; they resolve to table defaults.
//! Everything below is surfaced to the caller, never converted into a
//! default prediction.

use thiserror::Error;

pub type PredictorResult<T> = Result<T, PredictorError>;

#[derive(Debug, Error)]
pub enum PredictorError {
    /// Malformed flight query, rejected before derivation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Route string does not split into exactly origin and destination
    #[error("Malformed route '{route}': expected 'ORIGIN - DEST'")]
    MalformedRoute { route: String },

    /// Pipeline artifact missing, corrupt or failing its checksum
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Feature vector or transformed row disagrees with the fitted schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Lookup artifact source unreachable or unreadable
    #[error("Lookup tables unavailable: {0}")]
    LookupUnavailable(String),
}

impl PredictorError {
    /// Startup errors stop the service from serving any request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PredictorError::ModelUnavailable(_) | PredictorError::LookupUnavailable(_)
        )
    }

    /// Short message suitable for an end user
    pub fn user_message(&self) -> String {
        match self {
            PredictorError::InvalidInput(msg) => format!("Please check your flight details: {}", msg),
            PredictorError::MalformedRoute { route } => {
                format!("The route '{}' is not in the form 'ORIGIN - DEST'.", route)
            }
            PredictorError::ModelUnavailable(_) | PredictorError::SchemaMismatch(_) => {
                "The prediction model is currently unavailable.".to_string()
            }
            PredictorError::LookupUnavailable(_) => {
                "Flight statistics could not be loaded.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(PredictorError::ModelUnavailable("x".into()).is_fatal());
        assert!(PredictorError::LookupUnavailable("x".into()).is_fatal());
        assert!(!PredictorError::InvalidInput("x".into()).is_fatal());
        assert!(!PredictorError::MalformedRoute { route: "EWRATL".into() }.is_fatal());
    }

    #[test]
    fn test_display_includes_route() {
        let err = PredictorError::MalformedRoute { route: "EWRATL".into() };
        assert!(err.to_string().contains("EWRATL"));
        assert!(err.user_message().contains("ORIGIN - DEST"));
    }
}
