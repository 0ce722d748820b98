//! Test fixtures: a small hand-fit pipeline and matching lookup tables.
//!
//! The departure estimator weights `is_redeye` heavily so a late-night
//! departure is predicted delayed with redeye as the top attribution.
//! The arrival estimator sits far below its boundary.

use std::fs;
use std::path::Path;

use super::label::DelayLabel;
use super::pipeline::{ColumnTransform, EstimatorArtifact, PipelineArtifact, PIPELINE_FORMAT_VERSION};
use crate::constants;
use crate::logic::features::layout::{feature_names, layout_hash, FEATURE_VERSION};
use crate::logic::features::FeatureVector;

pub const NUMERIC_COLUMNS: [&str; 10] = [
    "dep_hour",
    "airline_avg_arr_delay",
    "airline_avg_dep_delay",
    "route_density",
    "dest_cluster",
    "route_cluster",
    "is_redeye",
    "time_block_score",
    "month_delay_score",
    "dow_delay_score",
];

pub const CATEGORICAL_COLUMNS: [&str; 4] = ["month", "day_of_week", "origin", "dest"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn fixture_artifact() -> PipelineArtifact {
    PipelineArtifact {
        format_version: PIPELINE_FORMAT_VERSION,
        feature_version: Some(FEATURE_VERSION),
        layout_hash: Some(layout_hash()),
        input_features: feature_names().map(str::to_string).collect(),
        preprocessor: vec![
            ColumnTransform::StandardScaler {
                name: "num".into(),
                columns: strings(&NUMERIC_COLUMNS),
                mean: vec![13.0, 6.0, 10.0, 1.0, 1.5, 1.5, 0.2, 4.0, 6.5, 4.0],
                scale: vec![5.0, 3.0, 4.0, 0.5, 1.0, 1.0, 0.4, 2.0, 3.5, 2.0],
            },
            ColumnTransform::OneHotEncoder {
                name: "cat".into(),
                columns: strings(&CATEGORICAL_COLUMNS),
                categories: vec![
                    strings(&["Aug", "Dec", "Jul"]),
                    strings(&["Sat", "Tue"]),
                    strings(&["EWR", "JFK"]),
                    strings(&["ATL", "LAX"]),
                ],
            },
        ],
        estimators: vec![
            EstimatorArtifact {
                label: DelayLabel::Departure,
                coefficients: vec![
                    // numeric
                    0.1, 0.2, 0.3, 0.2, 0.05, 0.05, 1.5, 0.2, 0.1, 0.1,
                    // month, day, origin, dest
                    0.3, 0.5, 0.4, 0.2, 0.3, 0.1, 0.0, 0.2, 0.1,
                ],
                intercept: -1.0,
                background_mean: None,
            },
            EstimatorArtifact {
                label: DelayLabel::Arrival,
                coefficients: vec![
                    0.0, 0.05, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                ],
                intercept: -3.0,
                background_mean: None,
            },
        ],
    }
}

/// Delta Air Lines, EWR - ATL, Aug, Sat, 23:00 with fixture lookup values
pub fn redeye_vector() -> FeatureVector {
    FeatureVector::builder()
        .month("Aug")
        .day_of_week("Sat")
        .dep_hour(23)
        .origin("EWR")
        .dest("ATL")
        .airline_avg_arr_delay(5.5)
        .airline_avg_dep_delay(9.25)
        .route_density(0.8)
        .dest_cluster(2)
        .route_cluster(1)
        .is_redeye(true)
        .time_block_score(7)
        .month_delay_score(8)
        .dow_delay_score(5)
        .build()
        .expect("fixture vector is complete")
}

/// Write lookup CSVs and the pipeline JSON into `dir`
pub fn write_artifacts(dir: &Path) {
    fs::write(
        dir.join(constants::AIRLINE_DELAY_FILE),
        "airline_name,airline_avg_arr_delay,airline_avg_dep_delay\n\
         Delta Air Lines,5.5,9.25\n\
         United Air Lines Inc.,7.0,11.0\n",
    )
    .expect("write airline table");
    fs::write(
        dir.join(constants::ROUTE_DENSITY_FILE),
        "route,route_density\nEWR - ATL,0.8\nJFK - LAX,1.4\n",
    )
    .expect("write density table");
    fs::write(
        dir.join(constants::DEST_CLUSTER_FILE),
        "dest,dest_cluster\nATL,2\nLAX,1\n",
    )
    .expect("write dest table");
    fs::write(
        dir.join(constants::ROUTE_CLUSTER_FILE),
        "route,route_cluster\nEWR - ATL,1\nJFK - LAX,3\n",
    )
    .expect("write route table");
    fs::write(
        dir.join(constants::PIPELINE_FILE),
        serde_json::to_vec_pretty(&fixture_artifact()).expect("serialize pipeline"),
    )
    .expect("write pipeline");
}
