//! Feature Derivation - FlightQuery → FeatureVector
//!
//! Pure with respect to its inputs: the same query against the same lookup
//! store always yields the same vector.

use super::time_block::{is_redeye, TimeBlock};
use super::vector::FeatureVector;
use crate::logic::error::PredictorError;
use crate::logic::lookup::LookupStore;
use crate::logic::query::{split_route, FlightQuery, ROUTE_SEPARATOR};

pub struct FeatureDeriver<'a> {
    lookups: &'a LookupStore,
}

impl<'a> FeatureDeriver<'a> {
    pub fn new(lookups: &'a LookupStore) -> Self {
        Self { lookups }
    }

    pub fn derive(&self, query: &FlightQuery) -> Result<FeatureVector, PredictorError> {
        let (origin, dest) = split_route(query.route())?;
        // Route tables are keyed by the trimmed tokens, same as origin/dest
        let route = format!("{}{}{}", origin, ROUTE_SEPARATOR, dest);

        let airline = self.lookups.airline_delay(query.airline());
        let route_density = self.lookups.route_density(&route);
        let dest_cluster = self.lookups.dest_cluster(dest);
        let route_cluster = self.lookups.route_cluster(&route);

        let hour = query.dep_hour();
        let block = TimeBlock::from_hour(hour).ok_or_else(|| {
            PredictorError::InvalidInput(format!("departure hour {} outside 0-23", hour))
        })?;

        if !self.lookups.is_known_airline(query.airline()) {
            log::debug!("Unknown airline '{}', using default delays", query.airline());
        }

        FeatureVector::builder()
            .month(query.month().code())
            .day_of_week(query.day_of_week().code())
            .dep_hour(hour)
            .origin(origin)
            .dest(dest)
            .airline_avg_arr_delay(airline.avg_arr_delay)
            .airline_avg_dep_delay(airline.avg_dep_delay)
            .route_density(route_density)
            .dest_cluster(dest_cluster)
            .route_cluster(route_cluster)
            .is_redeye(is_redeye(hour))
            .time_block_score(block.delay_score())
            .month_delay_score(query.month().delay_score())
            .dow_delay_score(query.day_of_week().delay_score())
            .build()
    }
}
