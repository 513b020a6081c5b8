//! Incremental feasibility ledger.
//!
//! [`State`] tracks one worker's current selection together with the
//! per-item balance `stock(selected aisles) - demand(selected orders)`.
//! Every mutation touches only the affected order/aisle row, so the inner
//! search loops stay O(row size) instead of O(instance size).
//!
//! The selection bitmaps are the single source of truth; index lists are
//! derived on demand via [`State::solution`].

use std::collections::{HashMap, HashSet};

use crate::caches::Caches;
use crate::problem::{Problem, Solution};

/// How many top providers per deficit item the repair step considers.
const REPAIR_TOP_K: usize = 5;

/// Mutable per-worker search state. Borrows the shared read-only instance
/// and caches; one fresh `State` is built per multi-start iteration.
pub struct State<'a> {
    problem: &'a Problem,
    caches: &'a Caches,

    /// Per item: stock in selected aisles minus demand of selected orders.
    item_balance: Vec<i64>,
    /// Exactly the items with `item_balance < 0`.
    deficit_items: HashSet<usize>,
    /// Sum of `order_total_units` over selected orders.
    current_total_units: i64,

    order_selected: Vec<bool>,
    aisle_selected: Vec<bool>,
    selected_order_count: usize,
    selected_aisle_count: usize,
}

impl<'a> State<'a> {
    pub fn new(problem: &'a Problem, caches: &'a Caches) -> State<'a> {
        State {
            problem,
            caches,
            item_balance: vec![0; problem.item_count],
            deficit_items: HashSet::new(),
            current_total_units: 0,
            order_selected: vec![false; problem.orders.len()],
            aisle_selected: vec![false; problem.aisles.len()],
            selected_order_count: 0,
            selected_aisle_count: 0,
        }
    }

    /// Clears every selection without reallocating.
    pub fn reset(&mut self) {
        self.item_balance.fill(0);
        self.deficit_items.clear();
        self.current_total_units = 0;
        self.order_selected.fill(false);
        self.aisle_selected.fill(false);
        self.selected_order_count = 0;
        self.selected_aisle_count = 0;
    }

    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    pub fn caches(&self) -> &'a Caches {
        self.caches
    }

    pub fn item_balance(&self, item: usize) -> i64 {
        self.item_balance[item]
    }

    pub fn has_deficit(&self) -> bool {
        !self.deficit_items.is_empty()
    }

    /// Items currently in deficit, in no particular order.
    pub fn deficit_items(&self) -> impl Iterator<Item = usize> + '_ {
        self.deficit_items.iter().copied()
    }

    pub fn current_total_units(&self) -> i64 {
        self.current_total_units
    }

    pub fn is_order_selected(&self, order: usize) -> bool {
        self.order_selected[order]
    }

    pub fn is_aisle_selected(&self, aisle: usize) -> bool {
        self.aisle_selected[aisle]
    }

    pub fn selected_order_count(&self) -> usize {
        self.selected_order_count
    }

    pub fn selected_aisle_count(&self) -> usize {
        self.selected_aisle_count
    }

    /// No deficits and total units within `[lb, ub]`.
    pub fn is_feasible(&self) -> bool {
        self.deficit_items.is_empty()
            && self.current_total_units >= self.problem.lb
            && self.current_total_units <= self.problem.ub
    }

    /// Objective value `total units / selected aisles`, 0 without aisles.
    pub fn score(&self) -> f64 {
        if self.selected_aisle_count == 0 {
            return 0.0;
        }
        self.current_total_units as f64 / self.selected_aisle_count as f64
    }

    /// Selects an aisle; its stock raises the touched balances. No-op if
    /// already selected.
    pub fn add_aisle(&mut self, aisle: usize) {
        if self.aisle_selected[aisle] {
            return;
        }
        self.aisle_selected[aisle] = true;
        self.selected_aisle_count += 1;

        for line in &self.problem.aisles[aisle] {
            let was_deficit = self.item_balance[line.item] < 0;
            self.item_balance[line.item] += line.qty;
            if was_deficit && self.item_balance[line.item] >= 0 {
                self.deficit_items.remove(&line.item);
            }
        }
    }

    /// Exact inverse of [`State::add_aisle`].
    pub fn remove_aisle(&mut self, aisle: usize) {
        if !self.aisle_selected[aisle] {
            return;
        }
        self.aisle_selected[aisle] = false;
        self.selected_aisle_count -= 1;

        for line in &self.problem.aisles[aisle] {
            let was_covered = self.item_balance[line.item] >= 0;
            self.item_balance[line.item] -= line.qty;
            if was_covered && self.item_balance[line.item] < 0 {
                self.deficit_items.insert(line.item);
            }
        }
    }

    /// Selects an order; its demand lowers the touched balances.
    pub fn add_order(&mut self, order: usize) {
        if self.order_selected[order] {
            return;
        }
        self.order_selected[order] = true;
        self.selected_order_count += 1;
        self.current_total_units += self.caches.order_total_units[order];

        for line in &self.problem.orders[order] {
            let was_covered = self.item_balance[line.item] >= 0;
            self.item_balance[line.item] -= line.qty;
            if was_covered && self.item_balance[line.item] < 0 {
                self.deficit_items.insert(line.item);
            }
        }
    }

    /// Exact inverse of [`State::add_order`].
    pub fn remove_order(&mut self, order: usize) {
        if !self.order_selected[order] {
            return;
        }
        self.order_selected[order] = false;
        self.selected_order_count -= 1;
        self.current_total_units -= self.caches.order_total_units[order];

        for line in &self.problem.orders[order] {
            let was_deficit = self.item_balance[line.item] < 0;
            self.item_balance[line.item] += line.qty;
            if was_deficit && self.item_balance[line.item] >= 0 {
                self.deficit_items.remove(&line.item);
            }
        }
    }

    /// True iff the order fits the currently selected aisles without new
    /// deficits and without exceeding `ub`. Used by free-fill moves.
    pub fn can_fit_order(&self, order: usize) -> bool {
        if self.current_total_units + self.caches.order_total_units[order] > self.problem.ub {
            return false;
        }
        self.problem.orders[order]
            .iter()
            .all(|line| self.item_balance[line.item] >= line.qty)
    }

    /// Units of currently unmet demand that selecting this aisle would
    /// cover: `sum over its lines of min(qty, max(0, -balance))`.
    pub fn estimate_new_items_for_aisle(&self, aisle: usize) -> i64 {
        self.problem.aisles[aisle]
            .iter()
            .map(|line| line.qty.min((-self.item_balance[line.item]).max(0)))
            .sum()
    }

    /// Deselects every aisle whose removal keeps all touched balances
    /// non-negative, repeating until a full pass removes nothing. Returns
    /// the removed aisles so callers can revert a trial exactly.
    pub fn prune_aisles(&mut self) -> Vec<usize> {
        let problem = self.problem;
        let mut removed = Vec::new();
        loop {
            let mut changed = false;
            for aisle in 0..problem.aisles.len() {
                if !self.aisle_selected[aisle] {
                    continue;
                }
                let removable = problem.aisles[aisle]
                    .iter()
                    .all(|line| self.item_balance[line.item] - line.qty >= 0);
                if removable {
                    self.remove_aisle(aisle);
                    removed.push(aisle);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        removed
    }

    /// Deselects orders demanding deficit items, in cache order, until no
    /// deficit remains. Counterpart of [`State::prune_aisles`] for the
    /// rare case where shrinking the wave beats growing it.
    pub fn prune_orders(&mut self) {
        let caches = self.caches;
        while let Some(&item) = self.deficit_items.iter().next() {
            for &(_, order) in &caches.item_to_orders[item] {
                if self.item_balance[item] >= 0 {
                    break;
                }
                if self.order_selected[order] {
                    self.remove_order(order);
                }
            }
        }
    }

    /// Greedily selects unselected aisles until no deficit remains. Each
    /// round scores the top [`REPAIR_TOP_K`] providers of every deficit
    /// item by the deficit units they would actually cover and picks the
    /// best scorer, ties going to the lowest aisle index.
    ///
    /// Returns the number of aisles added, or `None` when some deficit
    /// cannot be satisfied by any unselected aisle.
    pub fn repair_solution(&mut self) -> Option<usize> {
        let caches = self.caches;
        let mut added = 0;

        while !self.deficit_items.is_empty() {
            let mut cover: HashMap<usize, i64> = HashMap::new();
            for &item in &self.deficit_items {
                let needed = -self.item_balance[item];
                let mut checked = 0;
                for &(qty, aisle) in &caches.item_to_aisles[item] {
                    if self.aisle_selected[aisle] {
                        continue;
                    }
                    *cover.entry(aisle).or_insert(0) += qty.min(needed);
                    checked += 1;
                    if checked >= REPAIR_TOP_K {
                        break;
                    }
                }
            }

            let mut best: Option<(i64, usize)> = None;
            for (&aisle, &covered) in &cover {
                let better = match best {
                    None => true,
                    Some((best_covered, best_aisle)) => {
                        covered > best_covered || (covered == best_covered && aisle < best_aisle)
                    }
                };
                if better {
                    best = Some((covered, aisle));
                }
            }

            let (_, aisle) = best?;
            self.add_aisle(aisle);
            added += 1;
        }
        Some(added)
    }

    /// Selects the aisle, then free-fills: repeatedly adds every order
    /// that now fits the selected stock, until a pass adds nothing.
    pub fn add_aisle_with_orders_greedy(&mut self, aisle: usize) {
        self.add_aisle(aisle);
        loop {
            let mut added_any = false;
            for order in 0..self.problem.orders.len() {
                if !self.order_selected[order] && self.can_fit_order(order) {
                    self.add_order(order);
                    added_any = true;
                }
            }
            if !added_any {
                break;
            }
        }
    }

    /// Reads the current selection out as a [`Solution`], indices
    /// ascending.
    pub fn solution(&self) -> Solution {
        Solution {
            orders: (0..self.order_selected.len())
                .filter(|&order| self.order_selected[order])
                .collect(),
            aisles: (0..self.aisle_selected.len())
                .filter(|&aisle| self.aisle_selected[aisle])
                .collect(),
        }
    }
}
