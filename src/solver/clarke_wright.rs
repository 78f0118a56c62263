use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::domain::error::SolverError;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{ProblemInstance, DEPOT_ID};
use crate::solver::fleet_check;

/// The distance saved by serving `i` and `j` on one route instead of two.
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// Savings below this are float noise on collinear pairs, not real gains.
const MIN_SAVING: f64 = 1e-6;

/// Clarke-Wright savings construction.
///
/// Every customer starts on its own depot-out-and-back route. Pairs are then
/// processed in descending order of `s(i,j) = d(0,i) + d(0,j) - d(i,j)`,
/// merging two routes end-to-end whenever both endpoints are route ends and
/// the combined load fits the capacity. A seed perturbs the savings values
/// slightly, which reorders the merge sequence for multi-start restarts.
pub fn build(instance: &ProblemInstance, seed: Option<u64>) -> Result<Solution, SolverError> {
    fleet_check(instance)?;

    let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
    let n = instance.num_customers();

    let mut savings: Vec<Saving> = (1..=n)
        .tuple_combinations()
        .map(|(i, j)| {
            let base = instance.distance(DEPOT_ID, i) + instance.distance(DEPOT_ID, j)
                - instance.distance(i, j);
            let value = match rng.as_mut() {
                Some(rng) => base * rng.gen_range(0.9..1.1),
                None => base,
            };
            Saving { i, j, value }
        })
        .filter(|s| s.value > MIN_SAVING)
        .collect();

    // Descending by value; exact ties resolved by lowest pair for determinism.
    savings.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.i.cmp(&b.i))
            .then_with(|| a.j.cmp(&b.j))
    });

    // route_of[c] names the route currently holding customer c; members holds
    // the visiting order of each live route.
    let mut route_of: Vec<usize> = (0..=n).collect();
    let mut members: Vec<Vec<usize>> = (0..=n).map(|c| if c == 0 { vec![] } else { vec![c] }).collect();
    let mut loads: Vec<f64> = (0..=n)
        .map(|c| if c == 0 { 0.0 } else { instance.location(c).demand })
        .collect();

    let mut merges = 0usize;
    for saving in &savings {
        let ri = route_of[saving.i];
        let rj = route_of[saving.j];
        if ri == rj {
            continue;
        }
        if loads[ri] + loads[rj] > instance.capacity() {
            continue;
        }

        let i_first = members[ri].first() == Some(&saving.i);
        let i_last = members[ri].last() == Some(&saving.i);
        let j_first = members[rj].first() == Some(&saving.j);
        let j_last = members[rj].last() == Some(&saving.j);

        // Merge so that i and j become adjacent interior stops.
        let (from, into) = if i_last && j_first {
            (rj, ri)
        } else if j_last && i_first {
            (ri, rj)
        } else if i_last && j_last {
            members[rj].reverse();
            (rj, ri)
        } else if i_first && j_first {
            members[ri].reverse();
            (rj, ri)
        } else {
            continue;
        };

        let mut moved = std::mem::take(&mut members[from]);
        members[into].append(&mut moved);
        loads[into] += loads[from];
        loads[from] = 0.0;
        for &c in &members[into] {
            route_of[c] = into;
        }
        merges += 1;
    }

    let live: Vec<&Vec<usize>> = members.iter().filter(|m| !m.is_empty()).collect();
    debug!(merges, routes = live.len(), "savings merges complete");

    if live.len() > instance.num_vehicles() {
        return Err(SolverError::CapacityExhausted {
            needed: live.len(),
            available: instance.num_vehicles(),
        });
    }

    let routes = live
        .iter()
        .map(|order| Route::from_customers(order, instance))
        .collect();
    Ok(Solution::from_routes(routes, "clarke_wright"))
}
