//! Sampled ledger-backed GRASP.
//!
//! Same scoring as the cached constructor, but each round evaluates at
//! most [`SAMPLE_SIZE`] random positions of the candidate pool and the
//! pool shrinks by swap-and-pop, so total work stays linear in the number
//! of picks instead of quadratic. A candidate that would overshoot `ub`
//! poisons its sample slot; when a whole sample is poisoned, one of its
//! members is discarded anyway so the loop always makes progress.

use rand::Rng;

use super::cached::order_score;
use crate::state::State;

const ALPHA: f64 = 0.5;
const SAMPLE_SIZE: usize = 80;

pub fn construct<R: Rng>(state: &mut State, rng: &mut R) {
    let problem = state.problem();
    let caches = state.caches();
    let mut pool: Vec<usize> = (0..problem.orders.len()).collect();

    while !pool.is_empty() {
        let attempts = pool.len().min(SAMPLE_SIZE);
        let mut sample: Vec<(f64, usize)> = Vec::with_capacity(attempts);
        let mut min_score = f64::INFINITY;
        let mut max_score = f64::NEG_INFINITY;

        for _ in 0..attempts {
            let position = rng.random_range(0..pool.len());
            let order = pool[position];

            if state.current_total_units() + caches.order_total_units[order] > problem.ub {
                sample.push((f64::NEG_INFINITY, position));
                continue;
            }
            let score = order_score(state, order);
            sample.push((score, position));
            min_score = min_score.min(score);
            max_score = max_score.max(score);
        }

        let threshold = max_score - ALPHA * (max_score - min_score);
        let rcl: Vec<usize> = sample
            .iter()
            .filter(|&&(score, _)| score.is_finite() && score >= threshold)
            .map(|&(_, position)| position)
            .collect();

        let position;
        if rcl.is_empty() {
            // Whole sample overshot ub; drop one so the pool shrinks.
            position = sample[0].1;
        } else {
            position = rcl[rng.random_range(0..rcl.len())];
            let order = pool[position];
            state.add_order(order);
            if state.repair_solution().is_none() {
                state.remove_order(order);
            }
        }
        pool.swap_remove(position);
    }

    state.prune_aisles();
}
