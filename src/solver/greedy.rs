use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::domain::error::SolverError;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{ProblemInstance, DEPOT_ID};
use crate::solver::{fleet_check, pick_candidate};

/// Nearest-neighbour construction.
///
/// Each vehicle starts at the depot and repeatedly visits the closest
/// unvisited customer that still fits its remaining capacity; when nothing
/// fits the route closes and the next vehicle opens. Customers left over once
/// the fleet is spent are reported as infeasible.
pub fn build(instance: &ProblemInstance, seed: Option<u64>) -> Result<Solution, SolverError> {
    fleet_check(instance)?;

    let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
    let n = instance.num_customers();
    let mut visited = vec![false; n + 1];
    let mut remaining = n;
    let mut routes = Vec::new();

    for vehicle in 0..instance.num_vehicles() {
        if remaining == 0 {
            break;
        }

        let mut current = DEPOT_ID;
        let mut load = 0.0_f64;
        let mut customers = Vec::new();

        loop {
            let candidates: Vec<(usize, f64)> = instance
                .customers()
                .iter()
                .filter(|c| !visited[c.id] && load + c.demand <= instance.capacity())
                .map(|c| (c.id, instance.distance(current, c.id)))
                .collect();

            let Some(next) = pick_candidate(&candidates, rng.as_mut()) else {
                break;
            };

            visited[next] = true;
            remaining -= 1;
            load += instance.location(next).demand;
            customers.push(next);
            current = next;
        }

        debug!(
            vehicle,
            stops = customers.len(),
            load,
            "closed greedy route"
        );
        if !customers.is_empty() {
            routes.push(Route::from_customers(&customers, instance));
        }
    }

    if remaining > 0 {
        let unplaced: Vec<usize> = (1..=n).filter(|&id| !visited[id]).collect();
        return Err(SolverError::Infeasible {
            customer_ids: unplaced,
        });
    }

    Ok(Solution::from_routes(routes, "greedy"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;

    fn instance(
        customers: Vec<(Coordinate, f64)>,
        capacity: f64,
        vehicles: Option<usize>,
    ) -> ProblemInstance {
        ProblemInstance::new(Coordinate::new(17.6868, 83.2185), customers, capacity, vehicles)
            .unwrap()
    }

    #[test]
    fn two_nearby_customers_share_one_route() {
        let instance = instance(
            vec![
                (Coordinate::new(17.7000, 83.2300), 10.0),
                (Coordinate::new(17.6950, 83.2250), 10.0),
            ],
            100.0,
            Some(1),
        );
        let solution = build(&instance, None).unwrap();

        assert_eq!(solution.num_vehicles_used, 1);
        let stops = solution.routes[0].stops();
        assert!(stops == [0, 1, 2, 0] || stops == [0, 2, 1, 0]);
        assert!(solution.total_distance > 0.0);
    }

    #[test]
    fn splits_when_capacity_would_overflow() {
        // Three customers of demand 40 against capacity 100: one vehicle can
        // carry at most two of them.
        let instance = instance(
            vec![
                (Coordinate::new(17.70, 83.23), 40.0),
                (Coordinate::new(17.69, 83.22), 40.0),
                (Coordinate::new(17.71, 83.21), 40.0),
            ],
            100.0,
            Some(2),
        );
        let solution = build(&instance, None).unwrap();

        assert_eq!(solution.num_vehicles_used, 2);
        let mut loads: Vec<f64> = solution.routes.iter().map(|r| r.total_demand()).collect();
        loads.sort_by(f64::total_cmp);
        assert_eq!(loads, vec![40.0, 80.0]);
        for route in &solution.routes {
            assert!(route.total_demand() <= instance.capacity());
        }
    }

    #[test]
    fn serves_every_customer_exactly_once() {
        let instance = instance(
            vec![
                (Coordinate::new(17.70, 83.23), 25.0),
                (Coordinate::new(17.71, 83.20), 25.0),
                (Coordinate::new(17.68, 83.25), 25.0),
                (Coordinate::new(17.66, 83.19), 25.0),
                (Coordinate::new(17.72, 83.24), 25.0),
            ],
            60.0,
            None,
        );
        let solution = build(&instance, None).unwrap();

        let mut served = solution.served_customers();
        served.sort_unstable();
        assert_eq!(served, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn same_seed_gives_identical_solutions() {
        let instance = instance(
            vec![
                (Coordinate::new(17.70, 83.23), 10.0),
                (Coordinate::new(17.71, 83.20), 10.0),
                (Coordinate::new(17.68, 83.25), 10.0),
                (Coordinate::new(17.66, 83.19), 10.0),
            ],
            30.0,
            None,
        );
        let a = build(&instance, Some(99)).unwrap();
        let b = build(&instance, Some(99)).unwrap();
        assert_eq!(a.routes, b.routes);
        assert_eq!(a.total_distance, b.total_distance);
    }

    #[test]
    fn reports_unplaceable_customers_when_fleet_too_small() {
        let instance = instance(
            vec![
                (Coordinate::new(17.70, 83.23), 60.0),
                (Coordinate::new(17.69, 83.22), 60.0),
            ],
            100.0,
            Some(1),
        );
        let err = build(&instance, None).unwrap_err();
        match err {
            SolverError::Infeasible { customer_ids } => assert_eq!(customer_ids, vec![2]),
            other => panic!("expected Infeasible, got {:?}", other),
        }
    }
}
