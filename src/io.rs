//! Instance and solution serialization.
//!
//! The instance format is a plain whitespace-separated token stream:
//!
//! ```text
//! O I A
//! O rows:  K  item qty  ... (K pairs)
//! A rows:  L  item qty  ... (L pairs)
//! lb ub
//! ```
//!
//! Solutions are written as the order count, one order index per line,
//! then the aisle count and one aisle index per line. The improvement log
//! is one `elapsed_seconds score` pair per accepted improvement.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::multistart::Improvement;
use crate::problem::{coalesce_lines, Line, Problem, Solution};

fn next_token<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str> {
    tokens
        .next()
        .with_context(|| format!("unexpected end of input while reading {what}"))
}

fn next_i64<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<i64> {
    let token = next_token(tokens, what)?;
    token
        .parse()
        .with_context(|| format!("invalid {what} token {token:?}"))
}

fn next_usize<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<usize> {
    let token = next_token(tokens, what)?;
    token
        .parse()
        .with_context(|| format!("invalid {what} token {token:?}"))
}

fn read_rows<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    count: usize,
    kind: &str,
) -> Result<Vec<Vec<Line>>> {
    let mut rows = Vec::with_capacity(count);
    for index in 0..count {
        let what = format!("{kind} {index}");
        let entries = next_usize(tokens, &format!("entry count of {what}"))?;
        let mut lines = Vec::with_capacity(entries);
        for _ in 0..entries {
            let item = next_usize(tokens, &format!("item of {what}"))?;
            let qty = next_i64(tokens, &format!("quantity of {what}"))?;
            lines.push(Line::new(item, qty));
        }
        rows.push(coalesce_lines(lines));
    }
    Ok(rows)
}

/// Reads a whole instance from the token stream, coalescing duplicate
/// items per row and validating the result. Any malformed token is a
/// fatal error carrying enough context to locate it.
pub fn read_problem<R: BufRead>(mut reader: R) -> Result<Problem> {
    let mut text = String::new();
    reader.read_to_string(&mut text).context("failed to read instance")?;
    let mut tokens = text.split_ascii_whitespace();

    let order_count = next_usize(&mut tokens, "order count")?;
    let item_count = next_usize(&mut tokens, "item count")?;
    let aisle_count = next_usize(&mut tokens, "aisle count")?;

    let orders = read_rows(&mut tokens, order_count, "order")?;
    let aisles = read_rows(&mut tokens, aisle_count, "aisle")?;

    let lb = next_i64(&mut tokens, "lb")?;
    let ub = next_i64(&mut tokens, "ub")?;

    let problem = Problem { orders, aisles, item_count, lb, ub };
    if let Err(reason) = problem.validate() {
        bail!("invalid instance: {reason}");
    }
    Ok(problem)
}

/// Writes a solution as counted index lists, indices 0-based.
pub fn write_solution<W: Write>(mut writer: W, solution: &Solution) -> std::io::Result<()> {
    writeln!(writer, "{}", solution.orders.len())?;
    for order in &solution.orders {
        writeln!(writer, "{order}")?;
    }
    writeln!(writer, "{}", solution.aisles.len())?;
    for aisle in &solution.aisles {
        writeln!(writer, "{aisle}")?;
    }
    Ok(())
}

/// Reads a solution back from the counted-list format.
pub fn read_solution<R: BufRead>(mut reader: R) -> Result<Solution> {
    let mut text = String::new();
    reader.read_to_string(&mut text).context("failed to read solution")?;
    let mut tokens = text.split_ascii_whitespace();

    let order_count = next_usize(&mut tokens, "order count")?;
    let mut orders = Vec::with_capacity(order_count);
    for _ in 0..order_count {
        orders.push(next_usize(&mut tokens, "order index")?);
    }

    let aisle_count = next_usize(&mut tokens, "aisle count")?;
    let mut aisles = Vec::with_capacity(aisle_count);
    for _ in 0..aisle_count {
        aisles.push(next_usize(&mut tokens, "aisle index")?);
    }

    Ok(Solution { orders, aisles })
}

/// Writes the improvement history, one `elapsed_seconds score` line per
/// accepted improvement, times with 6 decimal places.
pub fn write_improvement_log<W: Write>(
    mut writer: W,
    improvements: &[Improvement],
) -> std::io::Result<()> {
    for improvement in improvements {
        writeln!(writer, "{:.6} {}", improvement.elapsed_secs, improvement.score)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_problem_round() {
        let input = "2 2 1\n2 0 2 1 1\n1 1 3\n2 0 5 1 5\n1 8\n";
        let problem = read_problem(input.as_bytes()).unwrap();

        assert_eq!(problem.orders.len(), 2);
        assert_eq!(problem.aisles.len(), 1);
        assert_eq!(problem.item_count, 2);
        assert_eq!(problem.orders[0], vec![Line::new(0, 2), Line::new(1, 1)]);
        assert_eq!(problem.orders[1], vec![Line::new(1, 3)]);
        assert_eq!(problem.aisles[0], vec![Line::new(0, 5), Line::new(1, 5)]);
        assert_eq!((problem.lb, problem.ub), (1, 8));
    }

    #[test]
    fn test_read_problem_coalesces_duplicates() {
        let input = "1 1 0\n2 0 2 0 3\n0 5\n";
        let problem = read_problem(input.as_bytes()).unwrap();
        assert_eq!(problem.orders[0], vec![Line::new(0, 5)]);
    }

    #[test]
    fn test_read_problem_rejects_truncated_input() {
        let input = "1 1 1\n1 0 2\n";
        let err = read_problem(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"), "{err}");
    }

    #[test]
    fn test_read_problem_rejects_non_integer_token() {
        let input = "1 1 1\n1 0 two\n1 0 1\n0 5\n";
        let err = read_problem(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid"), "{err}");
    }

    #[test]
    fn test_read_problem_rejects_out_of_range_item() {
        let input = "1 1 1\n1 3 2\n1 0 1\n0 5\n";
        let err = read_problem(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid instance"), "{err}");
    }

    #[test]
    fn test_solution_round_trip() {
        let solution = Solution { orders: vec![0, 2, 5], aisles: vec![1, 3] };
        let mut buffer = Vec::new();
        write_solution(&mut buffer, &solution).unwrap();
        assert_eq!(
            String::from_utf8(buffer.clone()).unwrap(),
            "3\n0\n2\n5\n2\n1\n3\n"
        );

        let read_back = read_solution(buffer.as_slice()).unwrap();
        assert_eq!(read_back, solution);
    }

    #[test]
    fn test_empty_solution_round_trip() {
        let mut buffer = Vec::new();
        write_solution(&mut buffer, &Solution::default()).unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "0\n0\n");
        assert_eq!(read_solution(buffer.as_slice()).unwrap(), Solution::default());
    }

    #[test]
    fn test_improvement_log_format() {
        let improvements = [
            Improvement { elapsed_secs: 0.1234567, score: 2.5 },
            Improvement { elapsed_secs: 1.5, score: 3.0 },
        ];
        let mut buffer = Vec::new();
        write_improvement_log(&mut buffer, &improvements).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "0.123457 2.5\n1.500000 3\n"
        );
    }
}
