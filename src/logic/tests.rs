//! End-to-end Tests
//!
//! Artifacts on disk → FlightDelayService → Assessment.

use std::path::Path;

use crate::logic::config::ServiceConfig;
use crate::logic::error::PredictorError;
use crate::logic::explain::{RecommendationOutcome, NO_RISK_MESSAGE};
use crate::logic::features::{DayOfWeek, Month, TimeBlock};
use crate::logic::lookup::{FetchPolicy, LookupStore};
use crate::logic::model::fixtures::write_artifacts;
use crate::logic::model::DelayLabel;
use crate::logic::query::{FlightQuery, FlightRequest};
use crate::logic::service::FlightDelayService;

fn service(dir: &Path) -> FlightDelayService {
    let config = ServiceConfig {
        fetch: FetchPolicy::once(),
        ..ServiceConfig::with_artifact_dir(dir)
    };
    FlightDelayService::new(config)
}

fn query(airline: &str, route: &str, hour: i64) -> FlightQuery {
    FlightQuery::new(airline, route, Month::Aug, DayOfWeek::Sat, hour).unwrap()
}

#[test]
fn test_redeye_flight_assessment() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let service = service(dir.path());
    service.warm_up().unwrap();

    let assessment = service.assess(&query("Delta Air Lines", "EWR - ATL", 23)).unwrap();

    assert_eq!(assessment.features.number("is_redeye"), Some(1.0));
    assert_eq!(assessment.time_block, TimeBlock::LateEvening);
    assert_eq!(assessment.time_block_label, "9pm–12am");
    assert!(assessment.prediction.departure_delayed);
    assert!(!assessment.prediction.arrival_delayed);

    let departure = assessment.attributions.get(DelayLabel::Departure).unwrap();
    assert_eq!(departure.ranked()[0].name, "is_redeye");

    let rec = &assessment.recommendations[0];
    assert_eq!(rec.label, DelayLabel::Departure);
    assert_eq!(rec.outcome, RecommendationOutcome::Cause { feature: "is_redeye".into() });
    assert!(rec.messages[0].contains("red-eye"));

    let rec = &assessment.recommendations[1];
    assert_eq!(rec.outcome, RecommendationOutcome::NoRisk);
    assert_eq!(rec.messages, vec![NO_RISK_MESSAGE.to_string()]);
}

#[test]
fn test_attributions_sum_to_decision() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let service = service(dir.path());

    let features = service.derive(&query("Delta Air Lines", "EWR - ATL", 23)).unwrap();
    let attributions = service.explain(&features).unwrap();
    let pipeline = service.pipeline().unwrap();
    let row = pipeline.preprocessor().transform(&features).unwrap();

    for label in DelayLabel::ALL {
        let expected = pipeline.estimator(label).decision_score(&row.values);
        let got = attributions.get(label).unwrap().decision_score();
        assert!((expected - got).abs() < 1e-9, "{}", label);
    }
}

#[test]
fn test_unknown_airline_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let service = service(dir.path());

    let assessment = service.assess(&query("ZZZ Airways", "EWR - ATL", 10)).unwrap();
    assert_eq!(assessment.features.number("airline_avg_arr_delay"), Some(0.0));
    assert_eq!(assessment.features.number("airline_avg_dep_delay"), Some(0.0));
    assert_eq!(assessment.recommendations.len(), 2);
}

#[test]
fn test_malformed_route_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let service = service(dir.path());

    let result = service.assess(&query("Delta Air Lines", "EWRATL", 10));
    assert!(matches!(result, Err(PredictorError::MalformedRoute { .. })));
}

#[test]
fn test_missing_artifacts_fail_warm_up() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let err = service.warm_up().unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, PredictorError::LookupUnavailable(_)));
}

#[test]
fn test_missing_model_fails_warm_up() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    std::fs::remove_file(dir.path().join(crate::constants::PIPELINE_FILE)).unwrap();
    let service = service(dir.path());

    let err = service.warm_up().unwrap_err();
    assert!(matches!(err, PredictorError::ModelUnavailable(_)));
}

#[test]
fn test_request_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let service = service(dir.path());

    let request: FlightRequest = serde_json::from_str(
        r#"{ "airline_name": "Delta Air Lines", "route": "EWR - ATL",
             "month": "aug", "day_of_week": "SAT", "dep_hour": 23 }"#,
    )
    .unwrap();
    let assessment = service.assess(&FlightQuery::try_from(request).unwrap()).unwrap();

    let json = serde_json::to_value(&assessment).unwrap();
    assert_eq!(json["prediction"]["departure_delayed"], true);
    assert_eq!(json["time_block_label"], "9pm–12am");
    assert_eq!(service.status().inference_count, 1);
}

#[test]
fn test_non_finite_lookup_value_fails_closed() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    std::fs::write(
        dir.path().join(crate::constants::ROUTE_DENSITY_FILE),
        "route,route_density\nEWR - ATL,NaN\n",
    )
    .unwrap();
    let service = service(dir.path());

    let err = service.warm_up().unwrap_err();
    assert!(matches!(err, PredictorError::LookupUnavailable(_)));

    let result = service.assess(&query("Delta Air Lines", "EWR - ATL", 23));
    assert!(matches!(result, Err(PredictorError::LookupUnavailable(_))));
}

#[test]
fn test_concurrent_first_requests_load_lookups_once() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let service = service(dir.path());

    let stores: Vec<&LookupStore> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| service.lookups().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for store in &stores[1..] {
        assert!(std::ptr::eq(stores[0], *store));
    }
    assert_eq!(stores[0].route_density("EWR - ATL"), 0.8);
}
