use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, span, warn, Level};

use crate::domain::error::SolverError;
use crate::domain::solution::Solution;
use crate::domain::types::ProblemInstance;
use crate::solver::Strategy;

/// Best-of-N orchestration over the construction heuristics.
///
/// Every requested strategy runs once deterministically, then `restarts`
/// randomized variants per strategy run in parallel over the shared
/// read-only instance, with per-run seeds derived from the base seed so the
/// whole search is reproducible. The candidate with the lowest total
/// distance wins; exact ties prefer fewer vehicles, then the earliest run.
pub struct MultiStartSearch {
    restarts: usize,
    seed: u64,
}

struct RunOutcome {
    index: usize,
    strategy: Strategy,
    result: Result<Solution, SolverError>,
}

impl MultiStartSearch {
    pub fn new(restarts: usize, seed: u64) -> Self {
        MultiStartSearch { restarts, seed }
    }

    pub fn solve(
        &self,
        instance: &ProblemInstance,
        strategies: &[Strategy],
    ) -> Result<Solution, SolverError> {
        self.solve_until(instance, strategies, None)
    }

    /// Runs the search, honouring an optional deadline: the deterministic
    /// base pass always executes, randomized restarts launched after the
    /// deadline are skipped, and the best candidate found so far is returned
    /// rather than failing.
    pub fn solve_until(
        &self,
        instance: &ProblemInstance,
        strategies: &[Strategy],
        deadline: Option<Instant>,
    ) -> Result<Solution, SolverError> {
        let search_span = span!(Level::INFO, "multi_start", restarts = self.restarts);
        let _guard = search_span.enter();
        let started = Instant::now();

        // Deterministic base pass, one run per strategy.
        let mut outcomes: Vec<RunOutcome> = strategies
            .iter()
            .enumerate()
            .map(|(index, &strategy)| run_one(index, strategy, instance, None))
            .collect();

        // Randomized restarts, embarrassingly parallel: each run owns its
        // visited-sets and partial routes and only reads the instance.
        let base_seed = self.seed;
        let strategy_count = strategies.len();
        let specs: Vec<(usize, Strategy, u64)> = (0..self.restarts)
            .flat_map(|i| {
                strategies.iter().enumerate().map(move |(s, &strategy)| {
                    let index = strategy_count * (i + 1) + s;
                    (index, strategy, base_seed + index as u64)
                })
            })
            .collect();

        let restart_outcomes: Vec<RunOutcome> = specs
            .par_iter()
            .map(|&(index, strategy, seed)| {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return RunOutcome {
                        index,
                        strategy,
                        result: Err(SolverError::Timeout),
                    };
                }
                run_one(index, strategy, instance, Some(seed))
            })
            .collect();
        outcomes.extend(restart_outcomes);

        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.result, Err(SolverError::Timeout)))
            .count();
        if skipped > 0 {
            warn!(skipped, "deadline elapsed; returning best-so-far");
        }

        let best = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|s| (o.index, o.strategy, s)))
            .min_by(|(ia, _, a), (ib, _, b)| {
                a.total_distance
                    .total_cmp(&b.total_distance)
                    .then_with(|| a.num_vehicles_used.cmp(&b.num_vehicles_used))
                    .then_with(|| ia.cmp(ib))
            });

        match best {
            Some((index, strategy, solution)) => {
                info!(
                    winner = strategy.name(),
                    run = index,
                    distance = solution.total_distance,
                    vehicles = solution.num_vehicles_used,
                    "multi-start complete"
                );
                let mut solution = solution.clone();
                solution.algorithm = "multi_start".to_string();
                solution.solve_time = started.elapsed();
                Ok(solution)
            }
            None => {
                let errors: Vec<SolverError> = outcomes
                    .into_iter()
                    .filter_map(|o| o.result.err())
                    .filter(|e| *e != SolverError::Timeout)
                    .collect();
                Err(SolverError::AllStrategiesFailed(errors))
            }
        }
    }
}

fn run_one(
    index: usize,
    strategy: Strategy,
    instance: &ProblemInstance,
    seed: Option<u64>,
) -> RunOutcome {
    let run_started = Instant::now();
    let result = strategy.build(instance, seed);
    match &result {
        Ok(solution) => debug!(
            run = index,
            strategy = strategy.name(),
            elapsed_ms = run_started.elapsed().as_secs_f64() * 1000.0,
            distance = solution.total_distance,
            "run complete"
        ),
        Err(e) => debug!(
            run = index,
            strategy = strategy.name(),
            error = %e,
            "run failed"
        ),
    }
    RunOutcome {
        index,
        strategy,
        result,
    }
}
