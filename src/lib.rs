//! Flight Delay Core
//!
//! Predicts departure and arrival delay for a scheduled flight, attributes
//! each prediction to its input features and turns the strongest attribution
//! into advice.

pub mod constants;
pub mod logic;

pub use logic::config::{LookupMode, ServiceConfig};
pub use logic::error::{PredictorError, PredictorResult};
pub use logic::query::{FlightQuery, FlightRequest};
pub use logic::service::{Assessment, FlightDelayService};
