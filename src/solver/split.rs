use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::domain::error::SolverError;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{ProblemInstance, DEPOT_ID};
use crate::solver::{fleet_check, pick_candidate};

/// Giant-tour construction with a capacity-aware split.
///
/// Builds one capacity-blind nearest-neighbour tour over all customers, then
/// cuts it into depot-returning sub-routes wherever the running load would
/// exceed the vehicle capacity.
pub fn build(instance: &ProblemInstance, seed: Option<u64>) -> Result<Solution, SolverError> {
    fleet_check(instance)?;

    let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
    let tour = giant_tour(instance, rng.as_mut());
    let routes = split_by_capacity(&tour, instance)?;

    Ok(Solution::from_routes(routes, "tour_split"))
}

/// Nearest-neighbour visiting order over every customer, ignoring capacity.
fn giant_tour(instance: &ProblemInstance, mut rng: Option<&mut ChaCha8Rng>) -> Vec<usize> {
    let n = instance.num_customers();
    let mut visited = vec![false; n + 1];
    let mut order = Vec::with_capacity(n);
    let mut current = DEPOT_ID;

    while order.len() < n {
        let candidates: Vec<(usize, f64)> = instance
            .customers()
            .iter()
            .filter(|c| !visited[c.id])
            .map(|c| (c.id, instance.distance(current, c.id)))
            .collect();
        let next = pick_candidate(&candidates, rng.as_deref_mut()).expect("unvisited remain");
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Cuts an ordered visiting sequence into capacity-feasible sub-routes.
///
/// A single linear pass: a depot visit is inserted before any customer whose
/// demand would push the running load over capacity. Fails when the cuts
/// require more vehicles than the fleet has.
pub fn split_by_capacity(
    order: &[usize],
    instance: &ProblemInstance,
) -> Result<Vec<Route>, SolverError> {
    let mut routes = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut load = 0.0_f64;

    for &id in order {
        let demand = instance.location(id).demand;
        if !current.is_empty() && load + demand > instance.capacity() {
            routes.push(Route::from_customers(&current, instance));
            current.clear();
            load = 0.0;
        }
        current.push(id);
        load += demand;
    }
    if !current.is_empty() {
        routes.push(Route::from_customers(&current, instance));
    }

    debug!(cuts = routes.len(), "split giant tour");
    if routes.len() > instance.num_vehicles() {
        return Err(SolverError::CapacityExhausted {
            needed: routes.len(),
            available: instance.num_vehicles(),
        });
    }
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;

    fn line_instance(capacity: f64, vehicles: usize) -> ProblemInstance {
        ProblemInstance::new(
            Coordinate::new(0.0, 0.0),
            vec![
                (Coordinate::new(0.0, 0.1), 30.0),
                (Coordinate::new(0.0, 0.2), 30.0),
                (Coordinate::new(0.0, 0.3), 30.0),
                (Coordinate::new(0.0, 0.4), 30.0),
            ],
            capacity,
            Some(vehicles),
        )
        .unwrap()
    }

    #[test]
    fn split_cuts_at_capacity_boundaries() {
        let instance = line_instance(60.0, 2);
        let routes = split_by_capacity(&[1, 2, 3, 4], &instance).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].customer_ids(), &[1, 2]);
        assert_eq!(routes[1].customer_ids(), &[3, 4]);
        for route in &routes {
            assert!(route.total_demand() <= instance.capacity());
        }
    }

    #[test]
    fn split_fails_when_cuts_exceed_fleet() {
        let instance = line_instance(30.0, 2);
        let err = split_by_capacity(&[1, 2, 3, 4], &instance).unwrap_err();
        assert_eq!(
            err,
            SolverError::CapacityExhausted {
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn giant_tour_visits_every_customer_once() {
        let instance = line_instance(120.0, 1);
        let mut tour = giant_tour(&instance, None);
        tour.sort_unstable();
        assert_eq!(tour, vec![1, 2, 3, 4]);
    }

    #[test]
    fn nearest_neighbour_tour_follows_the_line() {
        let instance = line_instance(120.0, 1);
        assert_eq!(giant_tour(&instance, None), vec![1, 2, 3, 4]);
    }

    #[test]
    fn build_serves_all_customers_under_capacity() {
        let instance = line_instance(60.0, 2);
        let solution = build(&instance, None).unwrap();
        let mut served = solution.served_customers();
        served.sort_unstable();
        assert_eq!(served, vec![1, 2, 3, 4]);
        assert_eq!(solution.num_vehicles_used, 2);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let instance = line_instance(60.0, 2);
        let a = build(&instance, Some(5)).unwrap();
        let b = build(&instance, Some(5)).unwrap();
        assert_eq!(a.routes, b.routes);
    }
}
