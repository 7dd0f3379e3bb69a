//! §6.5, §4.F — Observer Interface (exposed).
//!
//! Concurrent `addValue` calls must use exclusive (writer) locking; a
//! shared/read lock would let two threads race to insert into the
//! underlying map (§5's shared-resources note).

use std::collections::HashMap;
use std::sync::RwLock;

pub trait PermutationStatisticsCollector: Send + Sync {
    fn on_baseline_statistic(&self, strategy: &str, value: f64);
    fn on_permuted_statistic(&self, strategy: &str, perm_index: usize, value: f64);
    fn on_strategy_completed(&self, strategy: &str, final_p_value: f64);
}

#[derive(Debug, Default)]
struct StrategyDiagnostics {
    baseline: Option<f64>,
    permuted: Vec<(usize, f64)>,
    final_p_value: Option<f64>,
}

/// An in-memory collector suitable for tests and single-process reporting.
/// All mutation goes through a single exclusive lock acquisition per call,
/// matching the reference's "exclusive locks on addValue" requirement.
#[derive(Debug, Default)]
pub struct InMemoryStatisticsCollector {
    by_strategy: RwLock<HashMap<String, StrategyDiagnostics>>,
}

impl InMemoryStatisticsCollector {
    pub fn new() -> Self {
        InMemoryStatisticsCollector::default()
    }

    pub fn baseline_of(&self, strategy: &str) -> Option<f64> {
        self.by_strategy.read().expect("poisoned").get(strategy).and_then(|d| d.baseline)
    }

    pub fn permuted_count(&self, strategy: &str) -> usize {
        self.by_strategy
            .read()
            .expect("poisoned")
            .get(strategy)
            .map(|d| d.permuted.len())
            .unwrap_or(0)
    }

    pub fn final_p_value_of(&self, strategy: &str) -> Option<f64> {
        self.by_strategy
            .read()
            .expect("poisoned")
            .get(strategy)
            .and_then(|d| d.final_p_value)
    }
}

impl PermutationStatisticsCollector for InMemoryStatisticsCollector {
    fn on_baseline_statistic(&self, strategy: &str, value: f64) {
        let mut guard = self.by_strategy.write().expect("poisoned");
        guard.entry(strategy.to_string()).or_default().baseline = Some(value);
    }

    fn on_permuted_statistic(&self, strategy: &str, perm_index: usize, value: f64) {
        let mut guard = self.by_strategy.write().expect("poisoned");
        guard
            .entry(strategy.to_string())
            .or_default()
            .permuted
            .push((perm_index, value));
    }

    fn on_strategy_completed(&self, strategy: &str, final_p_value: f64) {
        let mut guard = self.by_strategy.write().expect("poisoned");
        guard.entry(strategy.to_string()).or_default().final_p_value = Some(final_p_value);
    }
}
