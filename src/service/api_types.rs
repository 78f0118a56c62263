use serde::{Deserialize, Serialize};

use crate::config::constant::{DEFAULT_DEMAND, DEFAULT_VEHICLE_CAPACITY};
use crate::domain::error::SolverError;
use crate::domain::solution::Solution;
use crate::domain::types::{Coordinate, ProblemInstance};

/// Algorithm selector accepted at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Greedy,
    FarthestInsertion,
    ClarkeWright,
    #[default]
    MultiStart,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::FarthestInsertion => "farthest_insertion",
            Algorithm::ClarkeWright => "clarke_wright",
            Algorithm::MultiStart => "multi_start",
        }
    }
}

fn default_demand() -> f64 {
    DEFAULT_DEMAND
}

fn default_capacity() -> f64 {
    DEFAULT_VEHICLE_CAPACITY
}

/// One delivery point. Demand is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_demand")]
    pub demand: f64,
}

/// The boundary request, transport-agnostic (JSON in practice).
#[derive(Debug, Clone, Deserialize)]
pub struct SolveRequest {
    pub depot: Coordinate,
    pub deliveries: Vec<Delivery>,
    #[serde(default)]
    pub num_vehicles: Option<usize>,
    #[serde(default = "default_capacity")]
    pub vehicle_capacity: f64,
    #[serde(default)]
    pub algorithm: Algorithm,
}

/// One vehicle's route as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    pub vehicle_id: usize,
    pub coordinates: Vec<Coordinate>,
    pub distance: f64,
    pub customers_served: usize,
}

/// The boundary response.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResponse {
    pub routes: Vec<RouteResponse>,
    pub total_distance: f64,
    pub num_vehicles_used: usize,
    pub algorithm: String,
    pub solve_time_ms: f64,
    pub degraded: bool,
}

impl SolveResponse {
    pub fn from_solution(solution: &Solution, instance: &ProblemInstance) -> Self {
        let routes = solution
            .routes
            .iter()
            .filter(|r| !r.is_empty())
            .enumerate()
            .map(|(vehicle_id, route)| RouteResponse {
                vehicle_id,
                coordinates: route
                    .stops()
                    .iter()
                    .map(|&id| instance.location(id).coordinate)
                    .collect(),
                distance: route.total_distance(),
                customers_served: route.customer_ids().len(),
            })
            .collect();

        SolveResponse {
            routes,
            total_distance: solution.total_distance,
            num_vehicles_used: solution.num_vehicles_used,
            algorithm: solution.algorithm.clone(),
            solve_time_ms: solution.solve_time.as_secs_f64() * 1000.0,
            degraded: solution.degraded,
        }
    }
}

/// Structured error object returned instead of a solution.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
}

impl From<&SolverError> for ErrorResponse {
    fn from(err: &SolverError) -> Self {
        ErrorResponse {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply_when_fields_are_omitted() {
        let request: SolveRequest = serde_json::from_str(
            r#"{
                "depot": {"lat": 17.6868, "lon": 83.2185},
                "deliveries": [{"lat": 17.7, "lon": 83.23}]
            }"#,
        )
        .unwrap();

        assert_eq!(request.algorithm, Algorithm::MultiStart);
        assert_eq!(request.vehicle_capacity, DEFAULT_VEHICLE_CAPACITY);
        assert_eq!(request.num_vehicles, None);
        assert_eq!(request.deliveries[0].demand, DEFAULT_DEMAND);
    }

    #[test]
    fn algorithm_names_use_snake_case_on_the_wire() {
        let request: SolveRequest = serde_json::from_str(
            r#"{
                "depot": {"lat": 0.0, "lon": 0.0},
                "deliveries": [{"lat": 0.1, "lon": 0.0, "demand": 5.0}],
                "algorithm": "farthest_insertion"
            }"#,
        )
        .unwrap();
        assert_eq!(request.algorithm, Algorithm::FarthestInsertion);
        assert_eq!(request.algorithm.name(), "farthest_insertion");
    }

    #[test]
    fn error_response_carries_kind_and_message() {
        let err = SolverError::Infeasible {
            customer_ids: vec![3],
        };
        let body = ErrorResponse::from(&err);
        assert_eq!(body.kind, "infeasible");
        assert!(body.message.contains('3'));
    }
}
