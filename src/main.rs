//! Flight Delay - Command Line Entry Point
//!
//! Reads a JSON flight request (file argument or stdin) and prints the
//! assessment as JSON.
//!
//! ```text
//! flight-delay request.json
//! echo '{"airline_name":"Delta Air Lines","route":"EWR - ATL","month":"Aug","day_of_week":"Sat","dep_hour":23}' | flight-delay
//! ```

use std::io::Read;
use std::process::ExitCode;

use flight_delay_core::constants::{self, APP_NAME, APP_VERSION};
use flight_delay_core::{FlightDelayService, FlightQuery, FlightRequest, PredictorError, ServiceConfig};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = match constants::get_config_path() {
        Some(path) => match ServiceConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ServiceConfig::from_env(),
    };

    let service = FlightDelayService::new(config);

    // No partial service: missing artifacts stop us before any request
    if let Err(e) = service.warm_up() {
        log::error!("Startup failed: {}", e);
        eprintln!("{}", e.user_message());
        return ExitCode::FAILURE;
    }

    match run(&service) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(service: &FlightDelayService) -> Result<String, PredictorError> {
    let input = read_request()?;
    let request: FlightRequest = serde_json::from_str(&input)
        .map_err(|e| PredictorError::InvalidInput(format!("bad request JSON: {}", e)))?;

    let query = FlightQuery::try_from(request)?;
    let assessment = service.assess(&query)?;

    serde_json::to_string_pretty(&assessment)
        .map_err(|e| PredictorError::InvalidInput(format!("cannot render assessment: {}", e)))
}

fn read_request() -> Result<String, PredictorError> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| PredictorError::InvalidInput(format!("failed to read {}: {}", path, e))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| PredictorError::InvalidInput(format!("failed to read stdin: {}", e)))?;
            Ok(buf)
        }
    }
}
