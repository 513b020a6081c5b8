//! Multi-start execution loop.
//!
//! # Algorithm
//!
//! 1. Build the derived caches once; share problem and caches read-only.
//! 2. Each worker loops: check patience, build a fresh state, run the
//!    configured constructor then the refiner, score the candidate.
//! 3. Candidates are re-verified from scratch before touching the shared
//!    best; an infeasible one is discarded with a warning.
//! 4. Under the mutex: strictly better scores replace the best and reset
//!    the improvement clock; ties are discarded, so the best is monotone.
//!
//! Workers observe cancellation and stagnation only between iterations;
//! no inner operation blocks on anything but the best-slot mutex.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::MultistartConfig;
use crate::caches::Caches;
use crate::construct::{
    construct_aisle_first, construct_cached, construct_order_greedy, construct_sampled,
    refine_order_greedy, Heuristic,
};
use crate::problem::{Problem, Solution};
use crate::refine;
use crate::state::State;
use crate::verify;

/// One accepted improvement of the shared best.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    /// Seconds since the run started.
    pub elapsed_secs: f64,
    /// The new best score.
    pub score: f64,
}

/// Result of a multi-start run.
#[derive(Debug, Clone)]
pub struct MultistartResult {
    /// Best feasible wave found; empty when none was found in time.
    pub best: Solution,

    /// Score of the best wave, 0 when `best` is empty.
    pub best_score: f64,

    /// Total construct-refine iterations across all workers.
    pub iterations: usize,

    /// Every accepted improvement, in acceptance order.
    pub improvements: Vec<Improvement>,

    /// Whether cancelled externally.
    pub cancelled: bool,
}

/// Shared best slot; the mutex is held only around compare-and-update.
struct BestSlot {
    best_score: f64,
    best: Solution,
    last_improvement: Instant,
    improvements: Vec<Improvement>,
}

/// Executes the parallel multi-start search.
pub struct MultistartRunner;

impl MultistartRunner {
    /// Runs the search until stagnation.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`MultistartConfig::validate`] first to get a descriptive error).
    pub fn run(problem: &Problem, config: &MultistartConfig) -> MultistartResult {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// When the flag is set, every worker stops at the end of its current
    /// iteration and the best found so far is returned.
    pub fn run_with_cancel(
        problem: &Problem,
        config: &MultistartConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> MultistartResult {
        config.validate().expect("invalid MultistartConfig");

        let caches = Caches::new(problem);
        let start = Instant::now();
        let slot = Mutex::new(BestSlot {
            best_score: 0.0,
            best: Solution::default(),
            last_improvement: start,
            improvements: Vec::new(),
        });
        let iterations = AtomicUsize::new(0);
        let cancelled = AtomicBool::new(false);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .expect("failed to build worker pool");

        pool.broadcast(|context| {
            let mut rng = match config.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(context.index() as u64)),
                None => ChaCha8Rng::seed_from_u64(rand::random()),
            };

            loop {
                if let Some(ref flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        cancelled.store(true, Ordering::Relaxed);
                        break;
                    }
                }
                {
                    let slot = slot.lock().expect("best slot poisoned");
                    if slot.last_improvement.elapsed() >= config.patience {
                        break;
                    }
                }

                let candidate = run_iteration(config.heuristic, problem, &caches, &mut rng);
                iterations.fetch_add(1, Ordering::Relaxed);

                let score = candidate.score(problem);
                if score <= 0.0 {
                    continue;
                }
                if let Err(reason) = verify::check(problem, &candidate) {
                    warn!("discarding infeasible candidate: {reason}");
                    continue;
                }

                let mut slot = slot.lock().expect("best slot poisoned");
                if score > slot.best_score {
                    slot.best_score = score;
                    slot.best = candidate;
                    slot.last_improvement = Instant::now();
                    let improvement = Improvement {
                        elapsed_secs: start.elapsed().as_secs_f64(),
                        score,
                    };
                    slot.improvements.push(improvement);
                }
            }
        });

        let slot = slot.into_inner().expect("best slot poisoned");
        MultistartResult {
            best: slot.best,
            best_score: slot.best_score,
            iterations: iterations.load(Ordering::Relaxed),
            improvements: slot.improvements,
            cancelled: cancelled.load(Ordering::Relaxed),
        }
    }
}

/// One construct-refine pass with the chosen strategy.
fn run_iteration<R: Rng>(
    heuristic: Heuristic,
    problem: &Problem,
    caches: &Caches,
    rng: &mut R,
) -> Solution {
    match heuristic {
        Heuristic::OrderGreedy => {
            let mut solution = construct_order_greedy(problem, rng);
            refine_order_greedy(problem, &mut solution);
            // The pickup-based constructor lists indices in commit order.
            solution.orders.sort_unstable();
            solution.aisles.sort_unstable();
            solution
        }
        Heuristic::Cached | Heuristic::Sampled | Heuristic::AisleFirst => {
            let mut state = State::new(problem, caches);
            match heuristic {
                Heuristic::Cached => construct_cached(&mut state, rng),
                Heuristic::Sampled => construct_sampled(&mut state, rng),
                Heuristic::AisleFirst => construct_aisle_first(&mut state, rng),
                Heuristic::OrderGreedy => unreachable!(),
            }
            refine::refine(&mut state, rng);
            state.solution()
        }
    }
}
