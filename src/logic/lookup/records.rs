//! CSV record shapes for the four lookup artifacts

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::logic::error::PredictorError;

/// `airline_name,airline_avg_arr_delay,airline_avg_dep_delay`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirlineDelayRecord {
    pub airline_name: String,
    pub airline_avg_arr_delay: f64,
    pub airline_avg_dep_delay: f64,
}

/// `route,route_density`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteDensityRecord {
    pub route: String,
    pub route_density: f64,
}

/// `dest,dest_cluster`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestClusterRecord {
    pub dest: String,
    pub dest_cluster: i64,
}

/// `route,route_cluster`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteClusterRecord {
    pub route: String,
    pub route_cluster: i64,
}

/// Record-level checks applied after parsing
pub trait LookupRecord {
    /// Numeric fields that must be finite
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }
}

impl LookupRecord for AirlineDelayRecord {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("airline_avg_arr_delay", self.airline_avg_arr_delay),
            ("airline_avg_dep_delay", self.airline_avg_dep_delay),
        ]
    }
}

impl LookupRecord for RouteDensityRecord {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("route_density", self.route_density)]
    }
}

impl LookupRecord for DestClusterRecord {}

impl LookupRecord for RouteClusterRecord {}

/// Parse a headered CSV stream into typed records.
///
/// Extra columns are ignored; missing, unparsable or non-finite values fail
/// the whole table.
pub fn read_records<T, R>(reader: R, table: &str) -> Result<Vec<T>, PredictorError>
where
    T: DeserializeOwned + LookupRecord,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, row) in csv_reader.deserialize::<T>().enumerate() {
        let record = row.map_err(|e| {
            PredictorError::LookupUnavailable(format!(
                "{}: bad record at row {}: {}",
                table,
                line + 2,
                e
            ))
        })?;
        if let Some((field, value)) = record
            .numeric_fields()
            .into_iter()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(PredictorError::LookupUnavailable(format!(
                "{}: non-finite {} ({}) at row {}",
                table,
                field,
                value,
                line + 2
            )));
        }
        records.push(record);
    }

    Ok(records)
}
