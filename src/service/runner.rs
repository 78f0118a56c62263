use std::error::Error;

use chrono::Utc;
use colored::*;
use csv::Writer;
use dotenv::dotenv;
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::geocode::resolve_addresses;
use crate::config::constant::{DEFAULT_SEED, DEMO_LOCATION_COUNT};
use crate::database::sqlx::db_connection;
use crate::domain::types::Coordinate;
use crate::fixtures::data_generator::{demo_addresses, generate_request};
use crate::service::api_types::{Algorithm, SolveResponse};
use crate::service::solve::SolverService;

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();

    dotenv().ok();
    Ok(())
}

/// Demo entry point: geocodes the landmark addresses, builds a request
/// around them, solves it with every algorithm, and writes the best
/// multi-start routes to a CSV.
pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let pool = db_connection().await?;
    let client = Client::new();

    let addresses = demo_addresses();
    let resolved = resolve_addresses(&client, &pool, &addresses).await;

    let mut coordinates: Vec<Coordinate> = Vec::with_capacity(addresses.len());
    for (address, coordinate) in addresses.iter().zip(&resolved) {
        match coordinate {
            Some(c) => coordinates.push(*c),
            None => warn!("could not geocode {address}, skipping"),
        }
    }
    info!(
        resolved = coordinates.len(),
        requested = addresses.len(),
        "geocoding complete"
    );

    let request = generate_request(DEMO_LOCATION_COUNT, DEFAULT_SEED, &coordinates);
    let service = SolverService::default();

    let mut best: Option<SolveResponse> = None;
    for algorithm in [
        Algorithm::Greedy,
        Algorithm::FarthestInsertion,
        Algorithm::ClarkeWright,
        Algorithm::MultiStart,
    ] {
        let mut run_request = request.clone();
        run_request.algorithm = algorithm;

        match service.solve(&run_request) {
            Ok(response) => {
                print_summary(&response);
                let improved = best
                    .as_ref()
                    .map_or(true, |b| response.total_distance < b.total_distance);
                if improved {
                    best = Some(response);
                }
            }
            Err(e) => println!(
                "{} : {}",
                format_args!("{:<18}", algorithm.name()).to_string().red(),
                e
            ),
        }
    }

    if let Some(best) = best {
        let filename = format!("routes_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        save_routes_to_csv(&best, &filename)?;
        println!("\nBest routes written to {filename}");
    }

    Ok(())
}

fn print_summary(response: &SolveResponse) {
    let line = format!(
        "{:<18} : {:>10.1} m over {} vehicle(s) in {:.1} ms",
        response.algorithm, response.total_distance, response.num_vehicles_used,
        response.solve_time_ms
    );
    if response.degraded {
        println!("{} {}", line.red(), "(degraded)".red());
    } else {
        println!("{}", line.green());
    }
    for route in &response.routes {
        println!(
            "  vehicle {} serves {} customer(s) over {:.1} m",
            route.vehicle_id, route.customers_served, route.distance
        );
    }
}

fn save_routes_to_csv(response: &SolveResponse, filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;
    wtr.write_record(["vehicle_id", "stop", "lat", "lon"])?;

    for route in &response.routes {
        for (stop, coordinate) in route.coordinates.iter().enumerate() {
            wtr.write_record(&[
                route.vehicle_id.to_string(),
                stop.to_string(),
                coordinate.lat.to_string(),
                coordinate.lon.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
