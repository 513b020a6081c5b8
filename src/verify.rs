//! From-scratch feasibility verification.
//!
//! The driver never trusts the incremental ledger when accepting a
//! candidate into the shared best: this check recomputes everything from
//! the instance alone.

use crate::problem::{Problem, Solution};

/// Checks that the solution is a feasible wave: index sets are in range
/// and duplicate-free, selected aisles cover every unit of selected
/// demand, and total units lie within `[lb, ub]`.
pub fn check(problem: &Problem, solution: &Solution) -> Result<(), String> {
    let mut order_seen = vec![false; problem.orders.len()];
    for &order in &solution.orders {
        if order >= problem.orders.len() {
            return Err(format!("order index {order} out of range"));
        }
        if order_seen[order] {
            return Err(format!("order index {order} listed twice"));
        }
        order_seen[order] = true;
    }

    let mut aisle_seen = vec![false; problem.aisles.len()];
    for &aisle in &solution.aisles {
        if aisle >= problem.aisles.len() {
            return Err(format!("aisle index {aisle} out of range"));
        }
        if aisle_seen[aisle] {
            return Err(format!("aisle index {aisle} listed twice"));
        }
        aisle_seen[aisle] = true;
    }

    let mut balance = vec![0i64; problem.item_count];
    for &aisle in &solution.aisles {
        for line in &problem.aisles[aisle] {
            balance[line.item] += line.qty;
        }
    }

    let mut units = 0i64;
    for &order in &solution.orders {
        for line in &problem.orders[order] {
            balance[line.item] -= line.qty;
            units += line.qty;
        }
    }

    for (item, &left) in balance.iter().enumerate() {
        if left < 0 {
            return Err(format!("item {item} is short by {} units", -left));
        }
    }
    if units < problem.lb {
        return Err(format!("total units {units} below lb {}", problem.lb));
    }
    if units > problem.ub {
        return Err(format!("total units {units} above ub {}", problem.ub));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Line;

    fn problem() -> Problem {
        Problem {
            orders: vec![
                vec![Line::new(0, 3)],
                vec![Line::new(0, 2), Line::new(1, 1)],
            ],
            aisles: vec![
                vec![Line::new(0, 5)],
                vec![Line::new(1, 2)],
            ],
            item_count: 2,
            lb: 1,
            ub: 10,
        }
    }

    #[test]
    fn test_accepts_feasible_wave() {
        let problem = problem();
        let solution = Solution { orders: vec![0, 1], aisles: vec![0, 1] };
        assert!(check(&problem, &solution).is_ok());
    }

    #[test]
    fn test_rejects_uncovered_demand() {
        let problem = problem();
        let solution = Solution { orders: vec![1], aisles: vec![0] };
        let err = check(&problem, &solution).unwrap_err();
        assert!(err.contains("item 1"), "unexpected reason: {err}");
    }

    #[test]
    fn test_rejects_bounds_violations() {
        let problem = problem();
        let empty = Solution { orders: vec![], aisles: vec![0] };
        assert!(check(&problem, &empty).unwrap_err().contains("below lb"));

        let tight = Problem { ub: 2, ..problem };
        let solution = Solution { orders: vec![0], aisles: vec![0] };
        assert!(check(&tight, &solution).unwrap_err().contains("above ub"));
    }

    #[test]
    fn test_rejects_bad_index_sets() {
        let problem = problem();
        let out_of_range = Solution { orders: vec![5], aisles: vec![] };
        assert!(check(&problem, &out_of_range).is_err());

        let duplicated = Solution { orders: vec![0], aisles: vec![0, 0] };
        assert!(check(&problem, &duplicated).is_err());
    }

    #[test]
    fn test_empty_solution_feasible_iff_lb_zero() {
        let relaxed = Problem { lb: 0, ..problem() };
        assert!(check(&relaxed, &Solution::default()).is_ok());
        assert!(check(&problem(), &Solution::default()).is_err());
    }
}
