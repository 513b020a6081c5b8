//! Aisle-first construction.
//!
//! Instead of choosing orders and paying for the aisles they need, this
//! strategy opens promising aisles and free-fills orders into them. Each
//! round samples unselected aisles, scores them by the demand units they
//! would newly cover, and commits one from the RCL together with every
//! order that then fits. Stops as soon as the state is feasible, so waves
//! stay small on instances with a low `lb`.

use rand::Rng;

use super::log_guard;
use crate::state::State;

const ALPHA: f64 = 0.5;
const SAMPLE_SIZE: usize = 80;

pub fn construct<R: Rng>(state: &mut State, rng: &mut R) {
    let mut pool: Vec<usize> = (0..state.problem().aisles.len()).collect();

    while !pool.is_empty() {
        if state.is_feasible() {
            break;
        }

        let attempts = pool.len().min(SAMPLE_SIZE);
        let mut sample: Vec<(f64, usize)> = Vec::with_capacity(attempts);
        let mut min_score = f64::INFINITY;
        let mut max_score = f64::NEG_INFINITY;

        for _ in 0..attempts {
            let position = rng.random_range(0..pool.len());
            let aisle = pool[position];
            let score =
                log_guard(state.current_total_units() + state.estimate_new_items_for_aisle(aisle));
            sample.push((score, position));
            min_score = min_score.min(score);
            max_score = max_score.max(score);
        }

        // Every score is finite here, so the top scorer is always in.
        let threshold = max_score - ALPHA * (max_score - min_score);
        let rcl: Vec<usize> = sample
            .iter()
            .filter(|&&(score, _)| score >= threshold)
            .map(|&(_, position)| position)
            .collect();

        let position = rcl[rng.random_range(0..rcl.len())];
        state.add_aisle_with_orders_greedy(pool[position]);
        pool.swap_remove(position);
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
    fn test_construct_free_fills_orders() {
        let problem = problem(
            &[&[(0, 2)], &[(0, 1)], &[(1, 4)]],
            &[&[(0, 5)], &[(1, 4)]],
            2,
            1,
            20,
        );
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(31);

        construct(&mut state, &mut rng);
        assert!(state.is_feasible());
        assert!(state.selected_order_count() > 0);
        assert!(!state.has_deficit());
    }

    #[test]
    fn test_construct_stops_once_feasible() {
        // lb 1: a single aisle with its free-fill orders already
        // satisfies the bounds, so the pool is not drained.
        let problem = problem(
            &[&[(0, 3)], &[(1, 3)]],
            &[&[(0, 3)], &[(1, 3)]],
            2,
            1,
            3,
        );
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(33);

        construct(&mut state, &mut rng);
        assert!(state.is_feasible());
        assert_eq!(state.selected_aisle_count(), 1);
        assert_eq!(state.current_total_units(), 3);
    }

    #[test]
    fn test_construct_exhausts_pool_when_lb_unreachable() {
        let problem = problem(&[&[(0, 1)]], &[&[(0, 1)]], 1, 5, 10);
        let caches = Caches::new(&problem);
        let mut state = State::new(&problem, &caches);
        let mut rng = ChaCha8Rng::seed_from_u64(35);

        construct(&mut state, &mut rng);
        assert!(!state.is_feasible(), "only 1 unit exists but lb is 5");
    }
}
