//! Flight Query - validated user request
//!
//! Validation happens once, at construction. A `FlightQuery` that exists is
//! always in range; route parsing is left to feature derivation.

use serde::{Deserialize, Serialize};

use crate::logic::error::PredictorError;
use crate::logic::features::{DayOfWeek, Month};

/// Fixed separator between origin and destination
pub const ROUTE_SEPARATOR: &str = " - ";

/// Raw request as supplied by the input surface (all strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRequest {
    pub airline_name: String,
    pub route: String,
    pub month: String,
    pub day_of_week: String,
    pub dep_hour: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightQuery {
    airline: String,
    route: String,
    month: Month,
    day_of_week: DayOfWeek,
    dep_hour: u8,
}

impl FlightQuery {
    pub fn new(
        airline: impl Into<String>,
        route: impl Into<String>,
        month: Month,
        day_of_week: DayOfWeek,
        dep_hour: i64,
    ) -> Result<Self, PredictorError> {
        let airline = airline.into().trim().to_string();
        if airline.is_empty() {
            return Err(PredictorError::InvalidInput("airline must not be empty".into()));
        }

        let route = route.into();

        if !(0..=23).contains(&dep_hour) {
            return Err(PredictorError::InvalidInput(format!(
                "departure hour {} outside 0-23",
                dep_hour
            )));
        }

        Ok(Self {
            airline,
            route,
            month,
            day_of_week,
            dep_hour: dep_hour as u8,
        })
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub fn dep_hour(&self) -> u8 {
        self.dep_hour
    }
}

impl TryFrom<FlightRequest> for FlightQuery {
    type Error = PredictorError;

    fn try_from(request: FlightRequest) -> Result<Self, Self::Error> {
        let month = request.month.parse::<Month>()?;
        let day_of_week = request.day_of_week.parse::<DayOfWeek>()?;
        FlightQuery::new(
            request.airline_name,
            request.route,
            month,
            day_of_week,
            request.dep_hour,
        )
    }
}

/// Split `ORIGIN - DEST` into its two tokens
pub fn split_route(route: &str) -> Result<(&str, &str), PredictorError> {
    let malformed = || PredictorError::MalformedRoute { route: route.to_string() };

    let mut parts = route.split(ROUTE_SEPARATOR);
    let origin = parts.next().map(str::trim).ok_or_else(malformed)?;
    let dest = parts.next().map(str::trim).ok_or_else(malformed)?;

    if parts.next().is_some() || origin.is_empty() || dest.is_empty() {
        return Err(malformed());
    }

    Ok((origin, dest))
}
