//! §4.F — PALMastersMonteCarloValidation.
//!
//! The driver that enumerates strategies, re-runs each one's statistic
//! policy against `permutations` shuffles of the security's returns,
//! builds both per-strategy nulls and the family-max null, and hands the
//! results to Romano-Wolf correction.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use super::observer::PermutationStatisticsCollector;
use super::romano_wolf::{romano_wolf_stepdown, CorrectionResult, StrategyStatistic};
use crate::decimal::Decimal;
use crate::error::CorrectionError;
use crate::executor::{AnyExecutor, Executor};
use crate::statistics::backtester::{BackTester, FixedReturnsBackTester};
use crate::statistics::policies::MonteCarloTestPolicy;

/// One entry in the strategy family under validation: a name, the policy
/// used to score it, and the backtester producing its baseline return
/// series.
pub struct CandidateStrategy<'a> {
    pub name: String,
    pub policy: &'a dyn MonteCarloTestPolicy,
    pub backtester: &'a dyn BackTester,
}

/// Shuffles the security's return series `permutations` times, scoring
/// every candidate strategy's policy against each shuffle, and returns the
/// final Romano-Wolf-corrected results. Notifies `collector` per §6.5.
pub fn run_masters_validation(
    candidates: &[CandidateStrategy],
    permutations: u32,
    alpha: f64,
    seed: u64,
    executor: &AnyExecutor,
    collector: &dyn PermutationStatisticsCollector,
) -> Result<Vec<CorrectionResult>, CorrectionError> {
    if candidates.is_empty() {
        return Err(CorrectionError::NoStrategies);
    }

    let mut strategy_stats = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let baseline = candidate
            .policy
            .get_permutation_test_statistic(candidate.backtester, executor);
        collector.on_baseline_statistic(&candidate.name, baseline);

        let base_returns = candidate.backtester.all_high_res_returns();
        let num_trades = candidate.backtester.num_trades();

        let null: Vec<f64> = executor
            .parallel_for(permutations as usize, |perm_index| {
                let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(perm_index as u64));
                let mut shuffled: Vec<Decimal> = base_returns.clone();
                shuffled.shuffle(&mut rng);
                let permuted_backtester = FixedReturnsBackTester::new_daily(shuffled, num_trades);
                candidate
                    .policy
                    .get_permutation_test_statistic(&permuted_backtester, executor)
            })
            .into_iter()
            .enumerate()
            .map(|(perm_index, value)| {
                collector.on_permuted_statistic(&candidate.name, perm_index, value);
                value
            })
            .collect();

        strategy_stats.push(StrategyStatistic {
            name: candidate.name.clone(),
            baseline_stat: baseline,
            null,
        });
    }

    let results = romano_wolf_stepdown(&strategy_stats, alpha)?;
    for result in &results {
        collector.on_strategy_completed(&result.name, result.adjusted_p);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::observer::InMemoryStatisticsCollector;
    use crate::executor::AnyExecutor;
    use crate::statistics::policies::BootStrappedSharpeRatioPolicy;

    fn returns(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from_str_exact(v).unwrap()).collect()
    }

    #[test]
    fn runs_end_to_end_and_notifies_observer() {
        let bt = FixedReturnsBackTester::new_daily(
            returns(&[
                "0.02", "0.01", "-0.01", "0.03", "0.01", "-0.02", "0.015", "0.01", "-0.005", "0.02",
            ]),
            10,
        );
        let policy = BootStrappedSharpeRatioPolicy {
            min_trades: 1,
            min_bars: 1,
        };
        let candidates = vec![CandidateStrategy {
            name: "candidate-1".to_string(),
            policy: &policy,
            backtester: &bt,
        }];

        let collector = InMemoryStatisticsCollector::new();
        let executor = AnyExecutor::single();
        let results = run_masters_validation(&candidates, 20, 0.10, 7, &executor, &collector).unwrap();

        assert_eq!(results.len(), 1);
        assert!(collector.baseline_of("candidate-1").is_some());
        assert_eq!(collector.permuted_count("candidate-1"), 20);
        assert!(collector.final_p_value_of("candidate-1").is_some());
    }

    #[test]
    fn empty_candidate_list_raises() {
        let executor = AnyExecutor::single();
        let collector = InMemoryStatisticsCollector::new();
        let err = run_masters_validation(&[], 10, 0.05, 1, &executor, &collector).unwrap_err();
        assert_eq!(err, CorrectionError::NoStrategies);
    }
}
