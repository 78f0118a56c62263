use serde::{Deserialize, Serialize};

use crate::distance::matrix::build_matrix;
use crate::domain::error::SolverError;

/// Location id reserved for the depot.
pub const DEPOT_ID: usize = 0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    pub fn in_valid_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A depot or customer stop. Id 0 is always the depot (demand 0); customers
/// are numbered 1..=N in input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub id: usize,
    pub coordinate: Coordinate,
    pub demand: f64,
}

/// An immutable CVRP instance: depot, customers, fleet, and the pairwise
/// distance matrix computed once at construction.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    locations: Vec<Location>,
    distance_matrix: Vec<Vec<f64>>,
    capacity: f64,
    num_vehicles: usize,
}

impl ProblemInstance {
    /// Builds an instance from a depot and customer coordinates with demands.
    ///
    /// When `num_vehicles` is omitted the fleet size is derived from the real
    /// demand sum as `max(1, ceil(total_demand / capacity))`.
    pub fn new(
        depot: Coordinate,
        customers: Vec<(Coordinate, f64)>,
        capacity: f64,
        num_vehicles: Option<usize>,
    ) -> Result<Self, SolverError> {
        if customers.is_empty() {
            return Err(SolverError::Validation(
                "at least one customer is required".to_string(),
            ));
        }
        if capacity <= 0.0 || !capacity.is_finite() {
            return Err(SolverError::Validation(format!(
                "vehicle capacity must be positive, got {}",
                capacity
            )));
        }
        if let Some(n) = num_vehicles {
            if n == 0 {
                return Err(SolverError::Validation(
                    "number of vehicles must be at least 1".to_string(),
                ));
            }
        }

        let mut locations = Vec::with_capacity(customers.len() + 1);
        locations.push(Location {
            id: DEPOT_ID,
            coordinate: depot,
            demand: 0.0,
        });
        for (i, (coordinate, demand)) in customers.into_iter().enumerate() {
            if !demand.is_finite() || demand < 0.0 {
                return Err(SolverError::Validation(format!(
                    "customer {} has invalid demand {}",
                    i + 1,
                    demand
                )));
            }
            locations.push(Location {
                id: i + 1,
                coordinate,
                demand,
            });
        }

        for loc in &locations {
            if !loc.coordinate.in_valid_range() {
                return Err(SolverError::Validation(format!(
                    "location {} has out-of-range coordinate ({}, {})",
                    loc.id, loc.coordinate.lat, loc.coordinate.lon
                )));
            }
        }

        // A customer whose demand exceeds capacity can never be served.
        let oversized: Vec<usize> = locations
            .iter()
            .skip(1)
            .filter(|l| l.demand > capacity)
            .map(|l| l.id)
            .collect();
        if !oversized.is_empty() {
            return Err(SolverError::Infeasible {
                customer_ids: oversized,
            });
        }

        let total_demand: f64 = locations.iter().map(|l| l.demand).sum();
        let num_vehicles =
            num_vehicles.unwrap_or_else(|| ((total_demand / capacity).ceil() as usize).max(1));

        let distance_matrix = build_matrix(&locations);

        Ok(ProblemInstance {
            locations,
            distance_matrix,
            capacity,
            num_vehicles,
        })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: usize) -> &Location {
        &self.locations[id]
    }

    pub fn depot(&self) -> &Location {
        &self.locations[DEPOT_ID]
    }

    /// Customer locations, excluding the depot.
    pub fn customers(&self) -> &[Location] {
        &self.locations[1..]
    }

    pub fn num_customers(&self) -> usize {
        self.locations.len() - 1
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn total_demand(&self) -> f64 {
        self.locations.iter().map(|l| l.demand).sum()
    }

    /// Distance in metres between two location ids.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix[from][to]
    }

    pub fn distance_matrix(&self) -> &[Vec<f64>] {
        &self.distance_matrix
    }
}
