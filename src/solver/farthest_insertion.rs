use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::domain::error::SolverError;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{ProblemInstance, DEPOT_ID};
use crate::solver::{fleet_check, pick_candidate};

/// One open route under construction: customer order plus running load.
struct OpenRoute {
    order: Vec<usize>,
    load: f64,
}

/// Farthest-insertion construction.
///
/// A new route is seeded with the unvisited customer farthest from the depot;
/// afterwards the unvisited customer with the cheapest insertion across all
/// open routes is placed at its cost-minimizing position. A fresh vehicle
/// opens only when no remaining customer fits any open route.
pub fn build(instance: &ProblemInstance, seed: Option<u64>) -> Result<Solution, SolverError> {
    fleet_check(instance)?;

    let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
    let n = instance.num_customers();
    let mut visited = vec![false; n + 1];
    let mut remaining = n;
    let mut open: Vec<OpenRoute> = Vec::new();

    while remaining > 0 {
        // Best insertion per unvisited customer across all open routes.
        let mut placements: Vec<(usize, f64)> = Vec::new();
        let mut targets: Vec<(usize, usize)> = Vec::new(); // (route, position) per placement
        for customer in instance.customers().iter().filter(|c| !visited[c.id]) {
            let mut best: Option<(f64, usize, usize)> = None;
            for (r, route) in open.iter().enumerate() {
                if route.load + customer.demand > instance.capacity() {
                    continue;
                }
                for pos in 0..=route.order.len() {
                    let prev = if pos == 0 { DEPOT_ID } else { route.order[pos - 1] };
                    let next = if pos == route.order.len() {
                        DEPOT_ID
                    } else {
                        route.order[pos]
                    };
                    let increase = instance.distance(prev, customer.id)
                        + instance.distance(customer.id, next)
                        - instance.distance(prev, next);
                    if best.map_or(true, |(b, _, _)| increase < b) {
                        best = Some((increase, r, pos));
                    }
                }
            }
            if let Some((increase, r, pos)) = best {
                placements.push((customer.id, increase));
                targets.push((r, pos));
            }
        }

        if let Some(chosen) = pick_candidate(&placements, rng.as_mut()) {
            let slot = placements
                .iter()
                .position(|&(id, _)| id == chosen)
                .expect("chosen id comes from placements");
            let (r, pos) = targets[slot];
            open[r].order.insert(pos, chosen);
            open[r].load += instance.location(chosen).demand;
            visited[chosen] = true;
            remaining -= 1;
            continue;
        }

        // Nothing fits the open routes; seed a new one with the farthest
        // unvisited customer (negated distance so the picker maximizes).
        if open.len() >= instance.num_vehicles() {
            let unplaced: Vec<usize> = (1..=n).filter(|&id| !visited[id]).collect();
            return Err(SolverError::Infeasible {
                customer_ids: unplaced,
            });
        }

        let seeds: Vec<(usize, f64)> = instance
            .customers()
            .iter()
            .filter(|c| !visited[c.id])
            .map(|c| (c.id, -instance.distance(DEPOT_ID, c.id)))
            .collect();
        let first = pick_candidate(&seeds, rng.as_mut()).expect("remaining > 0");
        debug!(route = open.len(), seed_customer = first, "opened insertion route");
        open.push(OpenRoute {
            order: vec![first],
            load: instance.location(first).demand,
        });
        visited[first] = true;
        remaining -= 1;
    }

    let routes = open
        .iter()
        .map(|r| Route::from_customers(&r.order, instance))
        .collect();
    Ok(Solution::from_routes(routes, "farthest_insertion"))
}
