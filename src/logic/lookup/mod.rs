//! Lookup Module - precomputed airline/route/airport statistics
//!
//! Four read-only tables loaded once per service:
//! - airline → average arrival/departure delay (minutes)
//! - route → traffic density score
//! - destination airport → cluster id
//! - route → cluster id
//!
//! Unknown keys resolve to neutral defaults (0 / cluster 0), never errors.

pub mod records;
pub mod source;
pub mod table;

pub use source::{ArtifactSource, FetchPolicy};
pub use table::LookupTable;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::error::PredictorError;
use records::{
    read_records, AirlineDelayRecord, DestClusterRecord, RouteClusterRecord, RouteDensityRecord,
};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Historical airline delay averages, in minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirlineDelay {
    pub avg_arr_delay: f64,
    pub avg_dep_delay: f64,
}

/// Where each of the four tables is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSources {
    pub airline_delay: ArtifactSource,
    pub route_density: ArtifactSource,
    pub dest_cluster: ArtifactSource,
    pub route_cluster: ArtifactSource,
}

impl LookupSources {
    /// Standard file names inside an artifact directory
    pub fn local(dir: &Path) -> Self {
        Self {
            airline_delay: ArtifactSource::File(dir.join(constants::AIRLINE_DELAY_FILE)),
            route_density: ArtifactSource::File(dir.join(constants::ROUTE_DENSITY_FILE)),
            dest_cluster: ArtifactSource::File(dir.join(constants::DEST_CLUSTER_FILE)),
            route_cluster: ArtifactSource::File(dir.join(constants::ROUTE_CLUSTER_FILE)),
        }
    }

    /// Published tables on Google Drive
    pub fn google_drive() -> Self {
        Self {
            airline_delay: ArtifactSource::google_drive(constants::AIRLINE_DELAY_FILE_ID),
            route_density: ArtifactSource::google_drive(constants::ROUTE_DENSITY_FILE_ID),
            dest_cluster: ArtifactSource::google_drive(constants::DEST_CLUSTER_FILE_ID),
            route_cluster: ArtifactSource::google_drive(constants::ROUTE_CLUSTER_FILE_ID),
        }
    }
}

// ============================================================================
// LOOKUP STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct LookupStore {
    airline_delay: LookupTable<String, AirlineDelay>,
    route_density: LookupTable<String, f64>,
    dest_cluster: LookupTable<String, i64>,
    route_cluster: LookupTable<String, i64>,
}

impl LookupStore {
    pub fn new(
        airline_delay: LookupTable<String, AirlineDelay>,
        route_density: LookupTable<String, f64>,
        dest_cluster: LookupTable<String, i64>,
        route_cluster: LookupTable<String, i64>,
    ) -> Self {
        Self {
            airline_delay,
            route_density,
            dest_cluster,
            route_cluster,
        }
    }

    /// Empty store: every lookup yields its default
    pub fn empty() -> Self {
        Self::new(
            LookupTable::new(AirlineDelay::default()),
            LookupTable::new(0.0),
            LookupTable::new(0),
            LookupTable::new(0),
        )
    }

    /// Fetch and parse all four tables. Any failure is `LookupUnavailable`.
    pub fn load(sources: &LookupSources, policy: &FetchPolicy) -> Result<Self, PredictorError> {
        log::info!("Loading lookup tables...");

        let airline: Vec<AirlineDelayRecord> =
            read_records(sources.airline_delay.fetch(policy)?.as_slice(), "airline_delay")?;
        let density: Vec<RouteDensityRecord> =
            read_records(sources.route_density.fetch(policy)?.as_slice(), "route_density")?;
        let dest: Vec<DestClusterRecord> =
            read_records(sources.dest_cluster.fetch(policy)?.as_slice(), "dest_cluster")?;
        let route: Vec<RouteClusterRecord> =
            read_records(sources.route_cluster.fetch(policy)?.as_slice(), "route_cluster")?;

        let store = Self::from_records(airline, density, dest, route);

        for (table, empty) in [
            ("airline_delay", store.airline_delay.is_empty()),
            ("route_density", store.route_density.is_empty()),
            ("dest_cluster", store.dest_cluster.is_empty()),
            ("route_cluster", store.route_cluster.is_empty()),
        ] {
            if empty {
                log::warn!("Lookup table '{}' is empty; every key resolves to its default", table);
            }
        }

        log::info!(
            "Lookup tables loaded: {} airlines, {} route densities, {} destinations, {} route clusters",
            store.airline_delay.len(),
            store.route_density.len(),
            store.dest_cluster.len(),
            store.route_cluster.len()
        );

        Ok(store)
    }

    pub fn from_records(
        airline: Vec<AirlineDelayRecord>,
        density: Vec<RouteDensityRecord>,
        dest: Vec<DestClusterRecord>,
        route: Vec<RouteClusterRecord>,
    ) -> Self {
        Self::new(
            LookupTable::from_records(
                airline.into_iter().map(|r| {
                    (
                        r.airline_name,
                        AirlineDelay {
                            avg_arr_delay: r.airline_avg_arr_delay,
                            avg_dep_delay: r.airline_avg_dep_delay,
                        },
                    )
                }),
                AirlineDelay::default(),
            ),
            LookupTable::from_records(density.into_iter().map(|r| (r.route, r.route_density)), 0.0),
            LookupTable::from_records(dest.into_iter().map(|r| (r.dest, r.dest_cluster)), 0),
            LookupTable::from_records(route.into_iter().map(|r| (r.route, r.route_cluster)), 0),
        )
    }

    // ------------------------------------------------------------------------
    // Resolution (never fails)
    // ------------------------------------------------------------------------

    pub fn airline_delay(&self, airline: &str) -> AirlineDelay {
        self.airline_delay.resolve(airline)
    }

    pub fn route_density(&self, route: &str) -> f64 {
        self.route_density.resolve(route)
    }

    pub fn dest_cluster(&self, dest: &str) -> i64 {
        self.dest_cluster.resolve(dest)
    }

    pub fn route_cluster(&self, route: &str) -> i64 {
        self.route_cluster.resolve(route)
    }

    pub fn is_known_airline(&self, airline: &str) -> bool {
        self.airline_delay.contains(airline)
    }

    pub fn is_known_route(&self, route: &str) -> bool {
        self.route_density.contains(route)
    }

    // ------------------------------------------------------------------------
    // Catalogue for the input surface
    // ------------------------------------------------------------------------

    /// Known airlines, sorted
    pub fn airlines(&self) -> Vec<String> {
        sorted_keys(self.airline_delay.keys())
    }

    /// Known routes (the density table is the route catalogue), sorted
    pub fn routes(&self) -> Vec<String> {
        sorted_keys(self.route_density.keys())
    }
}

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    keys.cloned().collect::<BTreeSet<_>>().into_iter().collect()
}
