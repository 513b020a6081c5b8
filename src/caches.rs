//! Derived indices built once per instance.
//!
//! All fields are write-once, read-many; the parallel workers share one
//! [`Caches`] by reference. Build cost is one linear pass over the order
//! and aisle rows plus a sort of each item's aisle list.

use crate::problem::Problem;

/// Immutable lookup tables derived from a [`Problem`].
#[derive(Debug, Clone)]
pub struct Caches {
    /// Per item: every `(qty, aisle)` carrying it, sorted by quantity
    /// descending, ties broken by aisle index ascending. The repair and
    /// scoring paths want "the aisle with the most of item `i`" first.
    pub item_to_aisles: Vec<Vec<(i64, usize)>>,

    /// Per item: every `(qty, order)` demanding it, in order-index order.
    pub item_to_orders: Vec<Vec<(i64, usize)>>,

    /// Sum of quantities per order, the numerator of the greedy scores.
    pub order_total_units: Vec<i64>,

    /// Total stock of each item across the whole warehouse. Fast fail for
    /// orders demanding more than physically exists.
    pub global_item_availability: Vec<i64>,
}

impl Caches {
    pub fn new(problem: &Problem) -> Caches {
        let mut item_to_aisles = vec![Vec::new(); problem.item_count];
        let mut item_to_orders = vec![Vec::new(); problem.item_count];
        let mut global_item_availability = vec![0i64; problem.item_count];
        let mut order_total_units = vec![0i64; problem.orders.len()];

        for (aisle, row) in problem.aisles.iter().enumerate() {
            for line in row {
                item_to_aisles[line.item].push((line.qty, aisle));
                global_item_availability[line.item] += line.qty;
            }
        }

        for (order, row) in problem.orders.iter().enumerate() {
            let mut units = 0;
            for line in row {
                item_to_orders[line.item].push((line.qty, order));
                units += line.qty;
            }
            order_total_units[order] = units;
        }

        for providers in &mut item_to_aisles {
            providers.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        }

        Caches {
            item_to_aisles,
            item_to_orders,
            order_total_units,
            global_item_availability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Line;

    fn problem() -> Problem {
        Problem {
            orders: vec![
                vec![Line::new(0, 2), Line::new(1, 3)],
                vec![Line::new(1, 1)],
            ],
            aisles: vec![
                vec![Line::new(0, 1), Line::new(1, 4)],
                vec![Line::new(1, 4)],
                vec![Line::new(0, 6)],
            ],
            item_count: 2,
            lb: 0,
            ub: 100,
        }
    }

    #[test]
    fn test_item_to_aisles_sorted_desc_with_index_ties() {
        let caches = Caches::new(&problem());
        assert_eq!(caches.item_to_aisles[0], vec![(6, 2), (1, 0)]);
        // Equal quantities fall back to ascending aisle index.
        assert_eq!(caches.item_to_aisles[1], vec![(4, 0), (4, 1)]);
    }

    #[test]
    fn test_item_to_orders() {
        let caches = Caches::new(&problem());
        assert_eq!(caches.item_to_orders[0], vec![(2, 0)]);
        assert_eq!(caches.item_to_orders[1], vec![(3, 0), (1, 1)]);
    }

    #[test]
    fn test_order_units_and_availability() {
        let caches = Caches::new(&problem());
        assert_eq!(caches.order_total_units, vec![5, 1]);
        assert_eq!(caches.global_item_availability, vec![7, 8]);
    }

    #[test]
    fn test_empty_instance() {
        let empty = Problem {
            orders: vec![],
            aisles: vec![],
            item_count: 0,
            lb: 0,
            ub: 0,
        };
        let caches = Caches::new(&empty);
        assert!(caches.item_to_aisles.is_empty());
        assert!(caches.order_total_units.is_empty());
    }
}
