use std::time::Instant;

use tracing::{info, span, warn, Level};

use crate::config::constant::{DEFAULT_RESTARTS, DEFAULT_SEED};
use crate::domain::error::SolverError;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{Coordinate, ProblemInstance};
use crate::service::api_types::{Algorithm, SolveRequest, SolveResponse};
use crate::solver::multi_start::MultiStartSearch;
use crate::solver::{first_fit_decreasing, Strategy};

/// The boundary component: validates requests, builds the instance,
/// dispatches to the selected heuristic, and guarantees a feasible answer
/// whenever one exists. Each call builds its own instance and shares no
/// state, so services can be invoked concurrently.
pub struct SolverService {
    restarts: usize,
    seed: u64,
}

impl Default for SolverService {
    fn default() -> Self {
        SolverService::new(DEFAULT_RESTARTS, DEFAULT_SEED)
    }
}

impl SolverService {
    pub fn new(restarts: usize, seed: u64) -> Self {
        SolverService { restarts, seed }
    }

    pub fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolverError> {
        self.solve_until(request, None)
    }

    /// Full request lifecycle with an optional multi-start deadline.
    ///
    /// Heuristic failures are recovered via the trivial fallback and flagged
    /// `degraded`; only validation failures and genuinely infeasible
    /// problems surface as errors.
    pub fn solve_until(
        &self,
        request: &SolveRequest,
        deadline: Option<Instant>,
    ) -> Result<SolveResponse, SolverError> {
        let solve_span = span!(
            Level::INFO,
            "solve_vrp",
            algorithm = request.algorithm.name(),
            deliveries = request.deliveries.len()
        );
        let _guard = solve_span.enter();
        let started = Instant::now();

        validate(request)?;

        let customers = request
            .deliveries
            .iter()
            .map(|d| (Coordinate::new(d.lat, d.lon), d.demand))
            .collect();
        let instance = ProblemInstance::new(
            request.depot,
            customers,
            request.vehicle_capacity,
            request.num_vehicles,
        )?;

        let dispatched = match request.algorithm {
            Algorithm::Greedy => Strategy::Greedy.build(&instance, None),
            Algorithm::FarthestInsertion => Strategy::FarthestInsertion.build(&instance, None),
            Algorithm::ClarkeWright => Strategy::ClarkeWright.build(&instance, None),
            Algorithm::MultiStart => MultiStartSearch::new(self.restarts, self.seed)
                .solve_until(&instance, &Strategy::ALL, deadline),
        };

        let mut solution = match dispatched {
            Ok(solution) => solution,
            Err(err) => {
                warn!(error = %err, "heuristic failed; trying trivial fallback");
                match trivial_fallback(&instance, request.algorithm) {
                    Ok(fallback) => fallback,
                    // The fallback only fails when the problem itself is
                    // infeasible; surface the original failure.
                    Err(_) => return Err(err),
                }
            }
        };

        solution.solve_time = started.elapsed();
        info!(
            distance = solution.total_distance,
            vehicles = solution.num_vehicles_used,
            degraded = solution.degraded,
            "request served"
        );
        Ok(SolveResponse::from_solution(&solution, &instance))
    }
}

fn validate(request: &SolveRequest) -> Result<(), SolverError> {
    if request.deliveries.is_empty() {
        return Err(SolverError::Validation(
            "at least one delivery is required".to_string(),
        ));
    }
    if request.vehicle_capacity <= 0.0 || !request.vehicle_capacity.is_finite() {
        return Err(SolverError::Validation(format!(
            "vehicle capacity must be positive, got {}",
            request.vehicle_capacity
        )));
    }
    if !request.depot.in_valid_range() {
        return Err(SolverError::Validation(format!(
            "depot coordinate ({}, {}) is out of range",
            request.depot.lat, request.depot.lon
        )));
    }
    for (i, d) in request.deliveries.iter().enumerate() {
        if !Coordinate::new(d.lat, d.lon).in_valid_range() {
            return Err(SolverError::Validation(format!(
                "delivery {} coordinate ({}, {}) is out of range",
                i, d.lat, d.lon
            )));
        }
    }
    Ok(())
}

/// First-fit-decreasing assignment: feasible far more often than the
/// heuristics it backs up, never good. Marked degraded so callers do not
/// mistake it for an optimized answer.
fn trivial_fallback(
    instance: &ProblemInstance,
    requested: Algorithm,
) -> Result<Solution, SolverError> {
    let routes: Vec<Route> = first_fit_decreasing(instance)?
        .iter()
        .map(|order| Route::from_customers(order, instance))
        .collect();
    let mut solution = Solution::from_routes(routes, requested.name());
    solution.degraded = true;
    Ok(solution)
}
