//! Order-centric GRASP without derived indices.
//!
//! Works directly on a [`Solution`] and a per-aisle remaining-stock map
//! instead of the incremental ledger, so it trades speed for simplicity:
//! candidate evaluation rescans the raw stock every round. Its companion
//! [`refine`] explores ADD / REMOVE / SWAP neighborhoods, rebuilding the
//! aisle set from scratch after every tentative move.

use std::collections::HashSet;

use rand::Rng;

use crate::problem::{Problem, Solution};

const ALPHA: f64 = 0.3;
const EPS: f64 = 1e-9;

/// Builds an initial selection by repeatedly committing one order from
/// the RCL, deducting its demand from remaining stock (preferring aisles
/// already in the wave) and appending any new aisle actually consumed.
pub fn construct<R: Rng>(problem: &Problem, rng: &mut R) -> Solution {
    let mut solution = Solution::default();
    let mut candidates: Vec<usize> = (0..problem.orders.len()).collect();

    // item -> remaining units, per aisle.
    let mut remaining_stock: Vec<Vec<(usize, i64)>> = problem
        .aisles
        .iter()
        .map(|row| row.iter().map(|line| (line.item, line.qty)).collect())
        .collect();
    let mut in_wave = vec![false; problem.aisles.len()];
    let mut current_total_units = 0i64;

    while !candidates.is_empty() {
        let mut scored: Vec<(f64, usize)> = Vec::new();
        let mut invalid: Vec<usize> = Vec::new();
        let mut best_cost = f64::NEG_INFINITY;
        let mut worst_cost = f64::INFINITY;

        for (position, &order) in candidates.iter().enumerate() {
            let units = problem.order_units(order);
            if current_total_units + units > problem.ub {
                invalid.push(position);
                continue;
            }

            let supplies_left = problem.orders[order].iter().all(|line| {
                let available: i64 = remaining_stock
                    .iter()
                    .map(|stock| stock_of(stock, line.item))
                    .sum();
                available >= line.qty
            });
            if !supplies_left {
                invalid.push(position);
                continue;
            }

            // Cost = units / (1 + aisles outside the wave that could
            // supply any of the order's items).
            let mut new_aisles = HashSet::new();
            for line in &problem.orders[order] {
                for (aisle, stock) in remaining_stock.iter().enumerate() {
                    if !in_wave[aisle] && stock_of(stock, line.item) > 0 {
                        new_aisles.insert(aisle);
                    }
                }
            }
            let cost = units as f64 / (1.0 + new_aisles.len() as f64);
            scored.push((cost, order));
            best_cost = best_cost.max(cost);
            worst_cost = worst_cost.min(cost);
        }

        for &position in invalid.iter().rev() {
            candidates.swap_remove(position);
        }
        if candidates.is_empty() || scored.is_empty() {
            break;
        }

        let threshold = best_cost - ALPHA * (best_cost - worst_cost);
        let rcl: Vec<usize> = scored
            .iter()
            .filter(|&&(cost, _)| cost >= threshold)
            .map(|&(_, order)| order)
            .collect();
        let chosen = if rcl.is_empty() {
            // Alpha filtered everything out; fall back to the single best.
            scored
                .iter()
                .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
                .map(|&(_, order)| order)
                .expect("scored is non-empty")
        } else {
            rcl[rng.random_range(0..rcl.len())]
        };

        solution.orders.push(chosen);
        for line in &problem.orders[chosen] {
            let mut needed = line.qty;

            // Drain aisles already in the wave first.
            for &aisle in &solution.aisles {
                if needed == 0 {
                    break;
                }
                needed -= take(&mut remaining_stock[aisle], line.item, needed);
            }

            // Then open new aisles as they get consumed.
            if needed > 0 {
                for aisle in 0..problem.aisles.len() {
                    if needed == 0 {
                        break;
                    }
                    if in_wave[aisle] {
                        continue;
                    }
                    let taken = take(&mut remaining_stock[aisle], line.item, needed);
                    if taken > 0 {
                        needed -= taken;
                        solution.aisles.push(aisle);
                        in_wave[aisle] = true;
                    }
                }
            }
        }
        current_total_units += problem.order_units(chosen);
        candidates.retain(|&order| order != chosen);
    }

    solution
}

fn stock_of(stock: &[(usize, i64)], item: usize) -> i64 {
    stock
        .iter()
        .find(|&&(stocked, _)| stocked == item)
        .map(|&(_, qty)| qty)
        .unwrap_or(0)
}

fn take(stock: &mut [(usize, i64)], item: usize, needed: i64) -> i64 {
    for entry in stock.iter_mut() {
        if entry.0 == item {
            let taken = needed.min(entry.1);
            entry.1 -= taken;
            return taken;
        }
    }
    0
}

/// Rebuilds the aisle set for the current orders by a greedy first-fit
/// pass over aisles in index order. Returns false when the order set is
/// outside the wave bounds or its demand cannot be covered at all.
fn rebuild_aisles(problem: &Problem, solution: &mut Solution) -> bool {
    solution.aisles.clear();
    if solution.orders.is_empty() {
        return problem.lb <= 0;
    }

    let units = solution.total_units(problem);
    if units < problem.lb || units > problem.ub {
        return false;
    }

    let mut needed = vec![0i64; problem.item_count];
    for &order in &solution.orders {
        for line in &problem.orders[order] {
            needed[line.item] += line.qty;
        }
    }

    let mut visited = vec![false; problem.aisles.len()];
    for (aisle, row) in problem.aisles.iter().enumerate() {
        for line in row {
            if needed[line.item] > 0 {
                needed[line.item] -= line.qty.min(needed[line.item]);
                visited[aisle] = true;
            }
        }
    }
    if needed.iter().any(|&left| left > 0) {
        return false;
    }

    solution.aisles = (0..problem.aisles.len()).filter(|&aisle| visited[aisle]).collect();
    true
}

/// Best-of-neighborhood local search over order sets: ADD one order,
/// REMOVE one order, SWAP one for one, first strict improvement wins,
/// until a full pass finds none.
pub fn refine(problem: &Problem, solution: &mut Solution) {
    let mut improved = true;
    while improved {
        improved = false;
        let current = solution.score(problem);

        let selected: HashSet<usize> = solution.orders.iter().copied().collect();
        let outside: Vec<usize> =
            (0..problem.orders.len()).filter(|order| !selected.contains(order)).collect();

        for &added in &outside {
            let mut neighbor = solution.clone();
            neighbor.orders.push(added);
            if rebuild_aisles(problem, &mut neighbor) && neighbor.score(problem) > current + EPS {
                *solution = neighbor;
                improved = true;
                break;
            }
        }
        if improved {
            continue;
        }

        for position in 0..solution.orders.len() {
            let mut neighbor = solution.clone();
            neighbor.orders.remove(position);
            if rebuild_aisles(problem, &mut neighbor) && neighbor.score(problem) > current + EPS {
                *solution = neighbor;
                improved = true;
                break;
            }
        }
        if improved {
            continue;
        }

        'swap: for position in 0..solution.orders.len() {
            for &added in &outside {
                let mut neighbor = solution.clone();
                neighbor.orders[position] = added;
                if rebuild_aisles(problem, &mut neighbor) && neighbor.score(problem) > current + EPS
                {
                    *solution = neighbor;
                    improved = true;
                    break 'swap;
                }
            }
        }
    }
}
