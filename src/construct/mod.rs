//! Randomized greedy constructors.
//!
//! Four interchangeable GRASP-style strategies build an initial selection
//! from an empty state. Each round scores the remaining candidates, keeps
//! the near-best ones in a restricted candidate list (RCL) cut at
//! `best - alpha * (best - worst)`, and commits one of them uniformly at
//! random. `alpha = 0` is pure greed, `alpha = 1` pure chance.
//!
//! # References
//!
//! - Feo, T.A. & Resende, M.G.C. (1995). "Greedy randomized adaptive
//!   search procedures", *Journal of Global Optimization* 6, 109-133.
//! - Resende, M.G.C. & Ribeiro, C.C. (2010). "Greedy randomized adaptive
//!   search procedures: advances and applications", *Handbook of
//!   Metaheuristics*, 283-319.

mod aisle_first;
mod cached;
mod order_greedy;
mod sampled;

pub use aisle_first::construct as construct_aisle_first;
pub use cached::construct as construct_cached;
pub use order_greedy::{construct as construct_order_greedy, refine as refine_order_greedy};
pub use sampled::construct as construct_sampled;

/// Constructor strategy, selected on the command line by index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Heuristic {
    /// Order-centric GRASP over raw per-aisle stock, no derived indices (0).
    OrderGreedy,
    /// Ledger-backed GRASP scoring every remaining order each round (1).
    #[default]
    Cached,
    /// Ledger-backed GRASP over a bounded random sample per round (2).
    Sampled,
    /// Aisle-first construction with greedy order free-fill (3).
    AisleFirst,
}

impl Heuristic {
    /// Maps a CLI selector to a strategy; `None` for out-of-range values.
    pub fn from_index(index: u8) -> Option<Heuristic> {
        match index {
            0 => Some(Heuristic::OrderGreedy),
            1 => Some(Heuristic::Cached),
            2 => Some(Heuristic::Sampled),
            3 => Some(Heuristic::AisleFirst),
            _ => None,
        }
    }
}

/// `ln(x + 1)`, the shared guard for the log-ratio scores.
///
/// Unit counts and aisle counts start at zero, so the raw logarithm would
/// produce infinities on the first rounds; shifting by one keeps every
/// score finite and is applied uniformly to numerators and denominators.
pub(crate) fn log_guard(x: i64) -> f64 {
    ((x.max(0) + 1) as f64).ln()
}
