//! Ledger-backed GRASP.
//!
//! Scores every remaining order each round against the live ledger:
//! benefit is the units gained, cost the estimated number of new aisles.
//! Committed orders are repaired immediately (aisles added to cover the
//! fresh deficits) and rolled back when repair fails.

use rand::Rng;

use super::log_guard;
use crate::state::State;

const ALPHA: f64 = 0.5;

/// Cheap upper-bound estimate of the aisles an order would pull in: one
/// per demanded item whose balance falls short, unless that item's single
/// best provider is already selected.
pub(super) fn estimated_new_aisles(state: &State, order: usize) -> i64 {
    let problem = state.problem();
    let caches = state.caches();

    let mut estimate = 0;
    for line in &problem.orders[order] {
        if state.item_balance(line.item) < line.qty {
            let covered = caches.item_to_aisles[line.item]
                .first()
                .is_some_and(|&(_, aisle)| state.is_aisle_selected(aisle));
            if !covered {
                estimate += 1;
            }
        }
    }
    estimate
}

pub(super) fn order_score(state: &State, order: usize) -> f64 {
    let units = state.caches().order_total_units[order];
    log_guard(state.current_total_units() + units)
        - log_guard(state.selected_aisle_count() as i64 + estimated_new_aisles(state, order))
}

pub fn construct<R: Rng>(state: &mut State, rng: &mut R) {
    let problem = state.problem();
    let caches = state.caches();
    let mut candidates: Vec<usize> = (0..problem.orders.len()).collect();

    while !candidates.is_empty() {
        let mut scored: Vec<(f64, usize)> = Vec::new();
        let mut min_score = f64::INFINITY;
        let mut max_score = f64::NEG_INFINITY;

        for (position, &order) in candidates.iter().enumerate() {
            if state.current_total_units() + caches.order_total_units[order] > problem.ub {
                continue;
            }
            let score = order_score(state, order);
            scored.push((score, position));
            min_score = min_score.min(score);
            max_score = max_score.max(score);
        }
        if scored.is_empty() {
            // Every remaining candidate overshoots ub.
            break;
        }

        let threshold = max_score - ALPHA * (max_score - min_score);
        let rcl: Vec<usize> = scored
            .iter()
            .filter(|&&(score, _)| score >= threshold)
            .map(|&(_, position)| position)
            .collect();
        let position = if rcl.is_empty() {
            scored[0].1
        } else {
            rcl[rng.random_range(0..rcl.len())]
        };

        let order = candidates[position];
        state.add_order(order);
        if state.repair_solution().is_none() {
            // Deficit unsatisfiable; any aisles the failed repair already
            // opened are cleaned up by the final prune.
            state.remove_order(order);
        }
        candidates.swap_remove(position);
    }

    state.prune_aisles();
}
