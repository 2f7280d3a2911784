use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{DEFAULT_SHARDS, DEFAULT_SIMULATIONS};
use crate::error::{PoolError, Result};

/// Shared flag a caller can flip to stop a running simulation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Settings for one simulation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Number of Monte Carlo trials
    pub simulations: u64,

    /// Seed for the master random source; `None` seeds from OS entropy
    pub seed: Option<u64>,

    /// Number of independently seeded shards; `None` uses `DEFAULT_SHARDS`.
    /// Fixed independently of the thread count so a seed reproduces across machines.
    pub shards: Option<usize>,

    /// Wall-clock budget for the run, in whole milliseconds
    pub time_limit_ms: Option<u64>,

    #[serde(skip)]
    pub cancel: Option<CancelToken>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
            shards: None,
            time_limit_ms: None,
            cancel: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_simulations(mut self, simulations: u64) -> Self {
        self.simulations = simulations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    /// Set the time limit. Sub-millisecond remainders round up.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        let millis = limit.as_nanos().div_ceil(1_000_000);
        self.time_limit_ms = Some(millis.min(u64::MAX as u128) as u64);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Shard count actually used, never more than the trial count.
    pub fn effective_shards(&self) -> usize {
        let requested = self.shards.unwrap_or(DEFAULT_SHARDS).max(1);
        let cap = usize::try_from(self.simulations).unwrap_or(usize::MAX).max(1);
        requested.min(cap)
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(PoolError::InvalidConfig {
                field: "simulations",
                message: "must be greater than 0".into(),
            });
        }
        if self.shards == Some(0) {
            return Err(PoolError::InvalidConfig {
                field: "shards",
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.simulations, 10_000);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"simulations": 500, "seed": 9, "timeLimitMs": 250}"#).unwrap();
        assert_eq!(config.simulations, 500);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
        assert!(config.shards.is_none());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let err = SimulationConfig::default().with_simulations(0).validate().unwrap_err();
        assert!(err.to_string().contains("simulations"));
        assert!(SimulationConfig::default().with_shards(0).validate().is_err());
    }

    #[test]
    fn test_effective_shards_capped_by_trials() {
        let config = SimulationConfig::default().with_simulations(3).with_shards(8);
        assert_eq!(config.effective_shards(), 3);
    }

    #[test]
    fn test_default_shards_fixed() {
        let config = SimulationConfig::default();
        assert_eq!(config.effective_shards(), DEFAULT_SHARDS);
    }

    #[test]
    fn test_time_limit_rounds_up() {
        let config = SimulationConfig::default().with_time_limit(Duration::from_micros(10));
        assert_eq!(config.time_limit_ms, Some(1));
        let config = SimulationConfig::default().with_time_limit(Duration::from_micros(1_500));
        assert_eq!(config.time_limit_ms, Some(2));
        let config = SimulationConfig::default().with_time_limit(Duration::ZERO);
        assert_eq!(config.time_limit_ms, Some(0));
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
