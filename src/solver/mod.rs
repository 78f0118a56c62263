pub mod clarke_wright;
pub mod farthest_insertion;
pub mod greedy;
pub mod multi_start;
pub mod split;

use rand_chacha::ChaCha8Rng;

use crate::config::constant::NEAR_TIE_FACTOR;
use crate::domain::error::SolverError;
use crate::domain::solution::Solution;
use crate::domain::types::ProblemInstance;

/// A construction heuristic usable standalone or inside a multi-start search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Greedy,
    FarthestInsertion,
    ClarkeWright,
    TourSplit,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Greedy,
        Strategy::FarthestInsertion,
        Strategy::ClarkeWright,
        Strategy::TourSplit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::FarthestInsertion => "farthest_insertion",
            Strategy::ClarkeWright => "clarke_wright",
            Strategy::TourSplit => "tour_split",
        }
    }

    /// Runs the heuristic. A `None` seed is fully deterministic (ties broken
    /// by lowest customer id); a seed enables randomized tie-breaking for
    /// multi-start restarts.
    pub fn build(
        &self,
        instance: &ProblemInstance,
        seed: Option<u64>,
    ) -> Result<Solution, SolverError> {
        match self {
            Strategy::Greedy => greedy::build(instance, seed),
            Strategy::FarthestInsertion => farthest_insertion::build(instance, seed),
            Strategy::ClarkeWright => clarke_wright::build(instance, seed),
            Strategy::TourSplit => split::build(instance, seed),
        }
    }
}

/// First-fit-decreasing assignment of customers to the fleet, used as the
/// service's last-resort fallback. Placing the largest demands first packs
/// tighter than input order, so this only leaves customers over on fleets
/// that are genuinely too small for any ordering it can reach.
pub(crate) fn first_fit_decreasing(
    instance: &ProblemInstance,
) -> Result<Vec<Vec<usize>>, SolverError> {
    let mut by_demand: Vec<usize> = instance.customers().iter().map(|c| c.id).collect();
    by_demand.sort_by(|&a, &b| {
        instance
            .location(b)
            .demand
            .total_cmp(&instance.location(a).demand)
            .then_with(|| a.cmp(&b))
    });

    let mut loads = vec![0.0_f64; instance.num_vehicles()];
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); instance.num_vehicles()];
    let mut unplaced = Vec::new();

    for id in by_demand {
        let demand = instance.location(id).demand;
        let slot = loads
            .iter()
            .position(|&load| load + demand <= instance.capacity());
        match slot {
            Some(v) => {
                loads[v] += demand;
                routes[v].push(id);
            }
            None => unplaced.push(id),
        }
    }

    if unplaced.is_empty() {
        Ok(routes)
    } else {
        unplaced.sort_unstable();
        Err(SolverError::Infeasible {
            customer_ids: unplaced,
        })
    }
}

/// Rejects instances whose demand sum exceeds the whole fleet's capacity,
/// naming the customers past the point where the running sum overflows.
/// This is only the aggregate bound; heuristics still report their own
/// leftovers when construction cannot place everyone.
pub(crate) fn fleet_check(instance: &ProblemInstance) -> Result<(), SolverError> {
    let fleet_capacity = instance.capacity() * instance.num_vehicles() as f64;
    let mut running = 0.0_f64;
    let mut overflow = Vec::new();

    for customer in instance.customers() {
        running += customer.demand;
        if running > fleet_capacity {
            overflow.push(customer.id);
        }
    }

    if overflow.is_empty() {
        Ok(())
    } else {
        Err(SolverError::Infeasible {
            customer_ids: overflow,
        })
    }
}

/// Picks from `(id, cost)` candidates: the cheapest with lowest id on ties,
/// or - when an RNG is supplied - a uniform pick among near-ties within
/// `NEAR_TIE_FACTOR` of the best cost.
pub(crate) fn pick_candidate(
    candidates: &[(usize, f64)],
    rng: Option<&mut ChaCha8Rng>,
) -> Option<usize> {
    use rand::Rng;

    let &(best_id, best_cost) = candidates.iter().min_by(|a, b| {
        a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
    })?;

    match rng {
        None => Some(best_id),
        Some(rng) => {
            let cutoff = best_cost + best_cost.abs() * NEAR_TIE_FACTOR;
            let near: Vec<usize> = candidates
                .iter()
                .filter(|(_, cost)| *cost <= cutoff)
                .map(|(id, _)| *id)
                .collect();
            Some(near[rng.gen_range(0..near.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;
    use rand::SeedableRng;

    fn mixed_demand_instance(num_vehicles: usize) -> ProblemInstance {
        // Demands 40,40,40,60,60,60 against capacity 100: feasible as three
        // {40, 60} pairs, but first-fit in input order would strand a 60.
        ProblemInstance::new(
            Coordinate::new(0.0, 0.0),
            vec![
                (Coordinate::new(0.0, 0.1), 40.0),
                (Coordinate::new(0.1, 0.0), 40.0),
                (Coordinate::new(-0.1, 0.0), 40.0),
                (Coordinate::new(0.0, 0.2), 60.0),
                (Coordinate::new(0.2, 0.0), 60.0),
                (Coordinate::new(-0.2, 0.0), 60.0),
            ],
            100.0,
            Some(num_vehicles),
        )
        .unwrap()
    }

    #[test]
    fn fleet_check_accepts_a_demand_sum_that_exactly_fills_the_fleet() {
        let instance = mixed_demand_instance(3);
        assert_eq!(fleet_check(&instance), Ok(()));
    }

    #[test]
    fn fleet_check_names_customers_past_the_fleet_capacity() {
        let instance = ProblemInstance::new(
            Coordinate::new(0.0, 0.0),
            vec![
                (Coordinate::new(0.0, 0.1), 60.0),
                (Coordinate::new(0.0, 0.2), 60.0),
            ],
            100.0,
            Some(1),
        )
        .unwrap();
        assert_eq!(
            fleet_check(&instance),
            Err(SolverError::Infeasible {
                customer_ids: vec![2]
            })
        );
    }

    #[test]
    fn first_fit_decreasing_packs_where_input_order_cannot() {
        let instance = mixed_demand_instance(3);
        let routes = first_fit_decreasing(&instance).unwrap();

        let mut served: Vec<usize> = routes.iter().flatten().copied().collect();
        served.sort_unstable();
        assert_eq!(served, vec![1, 2, 3, 4, 5, 6]);
        for route in &routes {
            let load: f64 = route.iter().map(|&id| instance.location(id).demand).sum();
            assert!(load <= instance.capacity());
        }
    }

    #[test]
    fn first_fit_decreasing_reports_leftovers_on_a_small_fleet() {
        let instance = mixed_demand_instance(2);
        let err = first_fit_decreasing(&instance).unwrap_err();
        assert!(matches!(err, SolverError::Infeasible { .. }));
    }

    #[test]
    fn deterministic_pick_prefers_lowest_id_on_exact_tie() {
        let candidates = vec![(5, 10.0), (2, 10.0), (9, 12.0)];
        assert_eq!(pick_candidate(&candidates, None), Some(2));
    }

    #[test]
    fn randomized_pick_stays_within_near_ties() {
        let candidates = vec![(1, 10.0), (2, 10.5), (3, 500.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = pick_candidate(&candidates, Some(&mut rng)).unwrap();
            assert!(picked == 1 || picked == 2);
        }
    }

    #[test]
    fn empty_candidate_list_yields_none() {
        assert_eq!(pick_candidate(&[], None), None);
    }
}
