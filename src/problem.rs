//! Problem instance and solution types.
//!
//! A [`Problem`] is immutable once built: the parallel workers share it by
//! reference for the whole run. The companion [`Solution`] is a plain value
//! holding the chosen order and aisle index sets.

/// One `(item, quantity)` entry of an order or an aisle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Line {
    /// Item identifier in `[0, item_count)`.
    pub item: usize,
    /// Units demanded (order) or stocked (aisle). At least 1 after ingest.
    pub qty: i64,
}

impl Line {
    pub fn new(item: usize, qty: i64) -> Line {
        Line { item, qty }
    }
}

/// Merges duplicate items within one order or aisle by summing quantities.
///
/// The rest of the engine assumes each item appears at most once per row;
/// the incremental ledger and the pickup-based constructor would otherwise
/// disagree on repeated items. Returns the lines sorted by item.
pub fn coalesce_lines(lines: Vec<Line>) -> Vec<Line> {
    let mut lines = lines;
    lines.sort_unstable_by_key(|line| line.item);

    let mut merged: Vec<Line> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.last_mut() {
            Some(last) if last.item == line.item => last.qty += line.qty,
            _ => merged.push(line),
        }
    }
    merged
}

/// An immutable wave-picking instance.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Problem {
    /// Demand rows, one per customer order.
    pub orders: Vec<Vec<Line>>,
    /// Stock rows, one per warehouse aisle.
    pub aisles: Vec<Vec<Line>>,
    /// Number of distinct item identifiers; all IDs are `< item_count`.
    pub item_count: usize,
    /// Inclusive lower bound on total units picked in a wave.
    pub lb: i64,
    /// Inclusive upper bound on total units picked in a wave.
    pub ub: i64,
}

impl Problem {
    /// Checks the instance invariants:
    /// - every referenced item ID is `< item_count`
    /// - every quantity is at least 1
    /// - within one order/aisle each item appears at most once
    /// - `0 <= lb <= ub`
    pub fn validate(&self) -> Result<(), String> {
        if self.lb < 0 {
            return Err(format!("lb must be non-negative, got {}", self.lb));
        }
        if self.lb > self.ub {
            return Err(format!("lb {} exceeds ub {}", self.lb, self.ub));
        }

        for (kind, rows) in [("order", &self.orders), ("aisle", &self.aisles)] {
            for (index, row) in rows.iter().enumerate() {
                let mut previous: Option<usize> = None;
                for line in row {
                    if line.item >= self.item_count {
                        return Err(format!(
                            "{kind} {index} references item {} but item_count is {}",
                            line.item, self.item_count
                        ));
                    }
                    if line.qty < 1 {
                        return Err(format!(
                            "{kind} {index} has non-positive quantity {} for item {}",
                            line.qty, line.item
                        ));
                    }
                    if previous.is_some_and(|p| p >= line.item) {
                        return Err(format!("{kind} {index} has duplicate or unsorted items"));
                    }
                    previous = Some(line.item);
                }
            }
        }
        Ok(())
    }

    /// Sum of quantities of one order row.
    pub fn order_units(&self, order: usize) -> i64 {
        self.orders[order].iter().map(|line| line.qty).sum()
    }
}

/// A chosen wave: order and aisle index sets, both 0-based and ascending.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Solution {
    pub orders: Vec<usize>,
    pub aisles: Vec<usize>,
}

impl Solution {
    /// Total units demanded by the selected orders.
    pub fn total_units(&self, problem: &Problem) -> i64 {
        self.orders.iter().map(|&order| problem.order_units(order)).sum()
    }

    /// Objective value `total_units / |aisles|`, or 0 with no aisles.
    pub fn score(&self, problem: &Problem) -> f64 {
        if self.aisles.is_empty() {
            return 0.0;
        }
        self.total_units(problem) as f64 / self.aisles.len() as f64
    }
}
