//! Wave-picking optimization engine.
//!
//! Given a catalog of customer orders (each a multiset of items with
//! quantities), a set of warehouse aisles (each a multiset of stocked
//! items), and a wave-size window `[lb, ub]`, the engine selects a subset
//! of orders and a subset of aisles such that the aisles cover every unit
//! of demand, total picked units lie inside the window, and the ratio
//! `picked units / visited aisles` is maximized.
//!
//! # Architecture
//!
//! - [`problem`]: immutable instance types and the [`problem::Solution`]
//!   value.
//! - [`caches`]: derived indices built once per instance (item → aisles,
//!   item → orders, per-order units, global availability).
//! - [`state`]: the per-worker incremental feasibility ledger. Every
//!   add/remove touches only the affected row, never the whole instance.
//! - [`construct`]: four interchangeable GRASP-style constructors
//!   producing an initial feasible selection.
//! - [`refine`]: local-search refinement shared by the ledger-backed
//!   constructors.
//! - [`multistart`]: the parallel multi-start driver with
//!   stagnation-based termination.
//! - [`verify`]: from-scratch feasibility check gating the shared best.
//! - [`io`]: instance reader, solution writer, improvement-log writer.
//!
//! # References
//!
//! Feo, T.A. & Resende, M.G.C. (1995). "Greedy randomized adaptive search
//! procedures", *Journal of Global Optimization* 6, 109-133.

pub mod caches;
pub mod construct;
pub mod io;
pub mod multistart;
pub mod problem;
pub mod refine;
pub mod state;
pub mod verify;
