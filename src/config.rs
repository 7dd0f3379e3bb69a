//! Ambient configuration layer (§3.10). A serde-deserializable document
//! supplying the numeric knobs the statistics engine needs, with documented
//! defaults so a partial config file is still valid.

use serde::{Deserialize, Serialize};

use crate::executor::ExecutorKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of bootstrap replicates (B in §4.E).
    pub bootstrap_replicates: u32,
    /// Confidence level 1 - alpha for BCa intervals.
    pub confidence_level: f64,
    /// Significance level alpha for multiple-testing correction (§4.F).
    pub significance_level: f64,
    /// Mean block length L for the stationary bootstrap (§4.D).
    pub block_length: u32,
    /// Deterministic seed for the top-level RNG.
    pub rng_seed: u64,
    /// Which executor drives the Monte-Carlo / universe-enumeration fan-out.
    pub executor: ExecutorKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            bootstrap_replicates: 2000,
            confidence_level: 0.95,
            significance_level: 0.05,
            block_length: 5,
            rng_seed: 0xC0FFEE,
            executor: ExecutorKind::ThreadPool,
        }
    }
}

impl RunConfig {
    pub fn alpha(&self) -> f64 {
        1.0 - self.confidence_level
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).map_err(|e| anyhow::anyhow!("failed to parse RunConfig TOML: {e}"))
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).map_err(|e| anyhow::anyhow!("failed to parse RunConfig JSON: {e}"))
    }

    pub fn load_from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = RunConfig::default();
        assert!(cfg.confidence_level > 0.0 && cfg.confidence_level < 1.0);
        assert!((cfg.alpha() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = RunConfig::from_toml_str("bootstrap_replicates = 500\n").unwrap();
        assert_eq!(cfg.bootstrap_replicates, 500);
        assert_eq!(cfg.block_length, RunConfig::default().block_length);
    }
}
