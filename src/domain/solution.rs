use std::time::Duration;

use crate::domain::types::{ProblemInstance, DEPOT_ID};

/// One vehicle's route: depot-bracketed stop ids plus cached totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stops: Vec<usize>,
    total_distance: f64,
    total_demand: f64,
}

impl Route {
    /// An unused vehicle.
    pub fn empty() -> Self {
        Route {
            stops: Vec::new(),
            total_distance: 0.0,
            total_demand: 0.0,
        }
    }

    /// Builds a route from customer ids in visiting order, bracketing them
    /// with the depot and computing distance and demand from the instance.
    pub fn from_customers(customers: &[usize], instance: &ProblemInstance) -> Self {
        if customers.is_empty() {
            return Route::empty();
        }

        let mut stops = Vec::with_capacity(customers.len() + 2);
        stops.push(DEPOT_ID);
        stops.extend_from_slice(customers);
        stops.push(DEPOT_ID);

        let total_distance = stops
            .windows(2)
            .map(|pair| instance.distance(pair[0], pair[1]))
            .sum();
        let total_demand = customers.iter().map(|&id| instance.location(id).demand).sum();

        Route {
            stops,
            total_distance,
            total_demand,
        }
    }

    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Customer ids without the depot brackets.
    pub fn customer_ids(&self) -> &[usize] {
        if self.stops.is_empty() {
            &[]
        } else {
            &self.stops[1..self.stops.len() - 1]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }
}

/// A complete candidate answer: one route per vehicle plus aggregates.
#[derive(Debug, Clone)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub total_distance: f64,
    pub num_vehicles_used: usize,
    pub algorithm: String,
    pub solve_time: Duration,
    pub degraded: bool,
}

impl Solution {
    pub fn from_routes(routes: Vec<Route>, algorithm: &str) -> Self {
        let total_distance = routes.iter().map(Route::total_distance).sum();
        let num_vehicles_used = routes.iter().filter(|r| !r.is_empty()).count();
        Solution {
            routes,
            total_distance,
            num_vehicles_used,
            algorithm: algorithm.to_string(),
            solve_time: Duration::ZERO,
            degraded: false,
        }
    }

    /// All customer ids across routes, in route order.
    pub fn served_customers(&self) -> Vec<usize> {
        self.routes
            .iter()
            .flat_map(|r| r.customer_ids().iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;

    fn two_customer_instance() -> ProblemInstance {
        ProblemInstance::new(
            Coordinate::new(17.6868, 83.2185),
            vec![
                (Coordinate::new(17.7000, 83.2300), 30.0),
                (Coordinate::new(17.6950, 83.2250), 20.0),
            ],
            100.0,
            Some(1),
        )
        .unwrap()
    }

    #[test]
    fn route_brackets_customers_with_depot() {
        let instance = two_customer_instance();
        let route = Route::from_customers(&[1, 2], &instance);
        assert_eq!(route.stops(), &[0, 1, 2, 0]);
        assert_eq!(route.customer_ids(), &[1, 2]);
        assert_eq!(route.total_demand(), 50.0);
        assert!(route.total_distance() > 0.0);
    }

    #[test]
    fn route_distance_sums_consecutive_legs() {
        let instance = two_customer_instance();
        let route = Route::from_customers(&[1, 2], &instance);
        let expected =
            instance.distance(0, 1) + instance.distance(1, 2) + instance.distance(2, 0);
        assert!((route.total_distance() - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_route_has_no_stops() {
        let route = Route::empty();
        assert!(route.is_empty());
        assert_eq!(route.customer_ids(), &[] as &[usize]);
        assert_eq!(route.total_distance(), 0.0);
    }

    #[test]
    fn solution_aggregates_ignore_unused_vehicles() {
        let instance = two_customer_instance();
        let routes = vec![Route::from_customers(&[1, 2], &instance), Route::empty()];
        let solution = Solution::from_routes(routes, "greedy");
        assert_eq!(solution.num_vehicles_used, 1);
        assert_eq!(solution.served_customers(), vec![1, 2]);
        assert!(solution.total_distance > 0.0);
        assert!(!solution.degraded);
    }
}
