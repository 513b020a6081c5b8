//! Local-search refinement for ledger-backed states.
//!
//! # Algorithm
//!
//! 1. Normalize: repair remaining deficits, then prune redundant aisles.
//! 2. Repeat until a full pass yields no improvement, taking the first
//!    move that strictly raises `units / aisles` while staying feasible:
//!    a. **ADD free fill**: select an order that fits the current stock.
//!    b. **DROP and prune**: deselect an order, prune the aisles it
//!       freed; revert both on rejection.
//!    c. **AISLE probe**: sample a few unselected aisles, open the one
//!       covering the most unmet demand together with its free-fill
//!       orders, if the projected ratio beats the current one.
//!
//! Moves a and b use exact scores; the probe accepts on a projection and
//! lets the next pass correct course.

use rand::Rng;

use crate::state::State;

const EPS: f64 = 1e-9;
const PROBE_SAMPLE: usize = 16;

pub fn refine<R: Rng>(state: &mut State, rng: &mut R) {
    state.repair_solution();
    state.prune_aisles();

    let problem = state.problem();
    let mut improved = true;
    while improved {
        improved = false;
        let current = state.score();

        // ADD free fill.
        for order in 0..problem.orders.len() {
            if state.is_order_selected(order) || !state.can_fit_order(order) {
                continue;
            }
            state.add_order(order);
            if state.is_feasible() && state.score() > current + EPS {
                improved = true;
                break;
            }
            state.remove_order(order);
        }
        if improved {
            continue;
        }

        // DROP and prune.
        let selected = state.solution().orders;
        for order in selected {
            state.remove_order(order);
            let pruned = state.prune_aisles();
            if state.score() > current + EPS && state.current_total_units() >= problem.lb {
                improved = true;
                break;
            }
            state.add_order(order);
            for aisle in pruned {
                state.add_aisle(aisle);
            }
        }
        if improved {
            continue;
        }

        // AISLE probe.
        if problem.aisles.is_empty() {
            continue;
        }
        let mut probe: Option<(i64, usize)> = None;
        for _ in 0..PROBE_SAMPLE {
            let aisle = rng.random_range(0..problem.aisles.len());
            if state.is_aisle_selected(aisle) {
                continue;
            }
            let gain = state.estimate_new_items_for_aisle(aisle);
            if probe.is_none_or(|(best_gain, _)| gain > best_gain) {
                probe = Some((gain, aisle));
            }
        }
        if let Some((gain, aisle)) = probe {
            let projected = (state.current_total_units() + gain) as f64
                / (state.selected_aisle_count() + 1) as f64;
            if projected > current + EPS {
                state.add_aisle_with_orders_greedy(aisle);
                improved = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caches::Caches;
    use crate::problem::{Line, Problem};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lines(entries: &[(usize, i64)]) -> Vec<Line> {
        entries.iter().map(|&(item, qty)| Line::new(item, qty)).collect()
    }

    fn problem(
        orders: &[&[(usize, i64)]],
        aisles: &[&[(usize, i64)]],
        item_count: usize,
        lb: i64,
        ub: i64,
    ) -> Problem {
        Problem {
            orders: orders.iter().map(|row| lines(row)).collect(),
            aisles: aisles.iter().map(|row| lines(row)).collect(),
            item_count,
            lb,
            ub,
        }
    }

    #[test]
    fn test_refine_adds_free_fill_orders() {
        let problem = problem(
            &[&[(0, 2)], &[(0, 1)]],
            &[&[(0, 5)]],
            1,
            1,
            10,
        );
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(41);

        state.add_aisle(0);
        state.add_order(0);
        refine(&mut state, &mut rng);

        assert!(state.is_order_selected(1), "order 1 fits the open aisle");
        assert_eq!(state.current_total_units(), 3);
        assert!(state.is_feasible());
    }

    #[test]
    fn test_refine_drops_expensive_order() {
        // Scenario: orders of 3 and 4 units, each on its own aisle.
        // Keeping both scores 3.5; dropping the 3-unit order and pruning
        // its aisle scores 4.0.
        let problem = problem(
            &[&[(0, 3)], &[(1, 4)]],
            &[&[(0, 3)], &[(1, 4)]],
            2,
            1,
            10,
        );
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(43);

        state.add_order(0);
        state.add_order(1);
        state.add_aisle(0);
        state.add_aisle(1);
        refine(&mut state, &mut rng);

        assert!((state.score() - 4.0).abs() < 1e-9);
        assert!(!state.is_order_selected(0));
        assert!(!state.is_aisle_selected(0));
        assert!(state.is_feasible());
    }

    #[test]
    fn test_refine_reverts_rejected_drops_exactly() {
        // A single order covered by a single aisle: dropping it would
        // violate lb, so the pass must restore the state untouched.
        let problem = problem(&[&[(0, 5)]], &[&[(0, 5)]], 1, 5, 5);
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(45);

        state.add_order(0);
        state.add_aisle(0);
        refine(&mut state, &mut rng);

        assert!(state.is_order_selected(0));
        assert!(state.is_aisle_selected(0));
        assert_eq!(state.current_total_units(), 5);
        assert!(state.is_feasible());
    }

    #[test]
    fn test_refine_normalizes_deficit_states() {
        let problem = problem(&[&[(0, 3)]], &[&[(0, 4)]], 1, 1, 10);
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(47);

        // Order without its aisle: entry repair must cover the deficit.
        state.add_order(0);
        refine(&mut state, &mut rng);

        assert!(!state.has_deficit());
        assert!(state.is_feasible());
        assert!((state.score() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_refine_probe_leaves_covered_states_alone() {
        // All demand is covered, so no unselected aisle can promise new
        // units and the probe must not open one.
        let problem = problem(
            &[&[(0, 2)]],
            &[&[(0, 2)], &[(0, 9)], &[(1, 9)]],
            2,
            1,
            10,
        );
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(49);

        state.add_order(0);
        state.add_aisle(0);
        refine(&mut state, &mut rng);

        assert_eq!(state.selected_aisle_count(), 1);
        assert!((state.score() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_refine_keeps_local_optimum_intact() {
        let problem = problem(
            &[&[(0, 1)], &[(1, 1)]],
            &[&[(0, 1), (1, 1)]],
            2,
            1,
            2,
        );
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(51);

        state.add_aisle(0);
        state.add_order(0);
        state.add_order(1);
        refine(&mut state, &mut rng);

        assert_eq!(state.selected_order_count(), 2);
        assert!((state.score() - 2.0).abs() < 1e-9);
    }
}
