//! Parallel multi-start driver.
//!
//! Spawns one worker per core; each repeatedly constructs and refines a
//! fresh candidate wave and races to improve a mutex-guarded shared best.
//! The run ends cooperatively once no worker has improved the best within
//! a patience window.

mod config;
mod runner;

pub use config::MultistartConfig;
pub use runner::{Improvement, MultistartResult, MultistartRunner};
