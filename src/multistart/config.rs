//! Multi-start configuration.

use std::time::Duration;

use crate::construct::Heuristic;

/// Configuration for the multi-start driver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wavepick::construct::Heuristic;
/// use wavepick::multistart::MultistartConfig;
///
/// let config = MultistartConfig::default()
///     .with_heuristic(Heuristic::Sampled)
///     .with_patience(Duration::from_secs(10))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct MultistartConfig {
    /// Wall-clock duration without any improvement after which every
    /// worker stops. Longer patience explores more at the cost of a
    /// longer tail on already-converged instances.
    pub patience: Duration,

    /// Worker thread count; 0 means one worker per available core.
    pub threads: usize,

    /// Constructor strategy run by every worker.
    pub heuristic: Heuristic,

    /// Base seed for reproducible runs; worker `i` derives `seed + i`.
    ///
    /// `None` seeds every worker from a nondeterministic source.
    pub seed: Option<u64>,
}

impl Default for MultistartConfig {
    fn default() -> Self {
        Self {
            patience: Duration::from_secs(3),
            threads: 0,
            heuristic: Heuristic::default(),
            seed: None,
        }
    }
}

impl MultistartConfig {
    pub fn with_patience(mut self, patience: Duration) -> Self {
        self.patience = patience;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.patience.is_zero() {
            return Err("patience must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MultistartConfig::default();
        assert_eq!(config.patience, Duration::from_secs(3));
        assert_eq!(config.threads, 0);
        assert_eq!(config.heuristic, Heuristic::Cached);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder() {
        let config = MultistartConfig::default()
            .with_patience(Duration::from_millis(250))
            .with_threads(2)
            .with_heuristic(Heuristic::AisleFirst)
            .with_seed(7);
        assert_eq!(config.patience, Duration::from_millis(250));
        assert_eq!(config.threads, 2);
        assert_eq!(config.heuristic, Heuristic::AisleFirst);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_zero_patience() {
        let config = MultistartConfig::default().with_patience(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
