//! §4.E — MonteCarloTestPolicy family.
//!
//! Statistic policies are the one genuinely open set in this crate (design
//! notes, §9): new policies can be added without touching the correction
//! engine, so they are modeled as a trait rather than a closed enum.

use crate::bootstrap::{bca_bootstrap, IntervalType};
use crate::decimal::Decimal;
use crate::executor::AnyExecutor;
use crate::statistics::backtester::BackTester;

/// A policy's documented "data inadequate" sentinel, returned instead of a
/// computed statistic when the backtester falls below the policy's
/// declared minimums (§7's "convergence/data-adequacy signal" category —
/// not an error).
pub const FAILURE_SENTINEL: f64 = f64::NEG_INFINITY;

pub trait MonteCarloTestPolicy: Send + Sync {
    fn min_strategy_trades(&self) -> u32;
    fn min_bar_series_size(&self) -> usize;

    /// Reads the backtester's high-resolution return series and returns
    /// either [`FAILURE_SENTINEL`] or a conservative (BCa lower-bound)
    /// score.
    fn get_permutation_test_statistic(&self, backtester: &dyn BackTester, executor: &AnyExecutor) -> f64 {
        let returns = backtester.all_high_res_returns();
        if backtester.num_trades() < self.min_strategy_trades() || returns.len() < self.min_bar_series_size() {
            return FAILURE_SENTINEL;
        }
        self.compute_statistic(&returns, executor)
    }

    fn compute_statistic(&self, returns: &[Decimal], executor: &AnyExecutor) -> f64;
}

fn profit_factor(returns: &[f64]) -> f64 {
    let gross_wins: f64 = returns.iter().filter(|r| **r > 0.0).sum();
    let gross_losses: f64 = returns.iter().filter(|r| **r < 0.0).map(|r| r.abs()).sum();
    if gross_losses == 0.0 {
        if gross_wins == 0.0 {
            1.0
        } else {
            f64::INFINITY
        }
    } else {
        gross_wins / gross_losses
    }
}

fn log_profit_factor(returns: &[f64]) -> f64 {
    let gross_wins: f64 = returns.iter().filter(|r| **r > 0.0).map(|r| (1.0 + r).ln()).sum();
    let gross_losses: f64 = returns
        .iter()
        .filter(|r| **r < 0.0)
        .map(|r| (1.0 + r).ln().abs())
        .sum();
    if gross_losses == 0.0 {
        if gross_wins == 0.0 {
            1.0
        } else {
            f64::INFINITY
        }
    } else {
        gross_wins / gross_losses
    }
}

fn sharpe_ratio(returns: &[f64]) -> f64 {
    let n = returns.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        0.0
    } else {
        mean / stddev
    }
}

fn bca_lower_bound<Stat>(returns: &[Decimal], statistic: Stat, executor: &AnyExecutor) -> f64
where
    Stat: Fn(&[f64]) -> f64 + Sync,
{
    // All-zero returns collapse every policy's statistic and interval to
    // zero (§8's boundary-behavior requirement).
    if returns.iter().all(|r| r.is_zero()) {
        return 0.0;
    }
    let sampler = |src: &[f64], rep_index: usize| -> Vec<f64> {
        use rand::{Rng, SeedableRng};
        use rand_pcg::Pcg64;
        let mut rng = Pcg64::seed_from_u64(0xB00_5EED ^ rep_index as u64);
        (0..src.len()).map(|_| src[rng.gen_range(0..src.len())]).collect()
    };
    bca_bootstrap(
        returns,
        2000,
        0.95,
        IntervalType::OneSidedLower,
        statistic,
        sampler,
        executor,
    )
    .map(|r| r.lower_bound.to_f64())
    .unwrap_or(FAILURE_SENTINEL)
}

#[derive(Debug, Clone, Copy)]
pub struct BootStrappedProfitFactorPolicy {
    pub min_trades: u32,
    pub min_bars: usize,
}

impl Default for BootStrappedProfitFactorPolicy {
    fn default() -> Self {
        BootStrappedProfitFactorPolicy {
            min_trades: 10,
            min_bars: 30,
        }
    }
}

impl MonteCarloTestPolicy for BootStrappedProfitFactorPolicy {
    fn min_strategy_trades(&self) -> u32 {
        self.min_trades
    }
    fn min_bar_series_size(&self) -> usize {
        self.min_bars
    }
    fn compute_statistic(&self, returns: &[Decimal], executor: &AnyExecutor) -> f64 {
        bca_lower_bound(returns, profit_factor, executor)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BootStrappedLogProfitFactorPolicy {
    pub min_trades: u32,
    pub min_bars: usize,
}

impl Default for BootStrappedLogProfitFactorPolicy {
    fn default() -> Self {
        BootStrappedLogProfitFactorPolicy {
            min_trades: 10,
            min_bars: 30,
        }
    }
}

impl MonteCarloTestPolicy for BootStrappedLogProfitFactorPolicy {
    fn min_strategy_trades(&self) -> u32 {
        self.min_trades
    }
    fn min_bar_series_size(&self) -> usize {
        self.min_bars
    }
    fn compute_statistic(&self, returns: &[Decimal], executor: &AnyExecutor) -> f64 {
        bca_lower_bound(returns, log_profit_factor, executor)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BootStrappedSharpeRatioPolicy {
    pub min_trades: u32,
    pub min_bars: usize,
}

impl Default for BootStrappedSharpeRatioPolicy {
    fn default() -> Self {
        BootStrappedSharpeRatioPolicy {
            min_trades: 10,
            min_bars: 30,
        }
    }
}

impl MonteCarloTestPolicy for BootStrappedSharpeRatioPolicy {
    fn min_strategy_trades(&self) -> u32 {
        self.min_trades
    }
    fn min_bar_series_size(&self) -> usize {
        self.min_bars
    }
    fn compute_statistic(&self, returns: &[Decimal], executor: &AnyExecutor) -> f64 {
        bca_lower_bound(returns, sharpe_ratio, executor)
    }
}

/// Composite score = clip(trueProfitability/expectedProfitability, 1) *
/// clip(truePF/targetPF, 1.5), where `expectedProfitability =
/// targetPF/(targetPF + payoffRatio) * 100` (§4.E). `target_profit_factor`
/// is the policy constant from the reference implementation;
/// `payoff_ratio` comes from the pattern under test
/// ([`crate::pattern::PriceActionLabPattern::payoff_ratio`]).
#[derive(Debug, Clone, Copy)]
pub struct BootStrappedProfitabilityPfPolicy {
    pub min_trades: u32,
    pub min_bars: usize,
    pub target_profit_factor: f64,
    pub payoff_ratio: f64,
}

impl BootStrappedProfitabilityPfPolicy {
    pub fn new(payoff_ratio: f64) -> Self {
        BootStrappedProfitabilityPfPolicy {
            min_trades: 10,
            min_bars: 30,
            target_profit_factor: 2.0,
            payoff_ratio,
        }
    }

    fn expected_profitability(&self) -> f64 {
        (self.target_profit_factor / (self.target_profit_factor + self.payoff_ratio)) * 100.0
    }
}

fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    (wins as f64 / returns.len() as f64) * 100.0
}

impl MonteCarloTestPolicy for BootStrappedProfitabilityPfPolicy {
    fn min_strategy_trades(&self) -> u32 {
        self.min_trades
    }
    fn min_bar_series_size(&self) -> usize {
        self.min_bars
    }
    fn compute_statistic(&self, returns: &[Decimal], executor: &AnyExecutor) -> f64 {
        if returns.iter().all(|r| r.is_zero()) {
            return 0.0;
        }
        let true_profitability = bca_lower_bound(returns, win_rate, executor);
        let true_pf = bca_lower_bound(returns, profit_factor, executor);

        let profitability_ratio = (true_profitability / self.expected_profitability()).min(1.0);
        let pf_ratio = (true_pf / self.target_profit_factor).min(1.5);
        profitability_ratio * pf_ratio
    }
}

/// Same structure as [`BootStrappedProfitabilityPfPolicy`] but built from
/// log profit factor and log-return-based profitability (§4.E). The
/// reference policy keeps its own `targetLogProfitFactor` constant and
/// expects a log-compressed win/loss ratio
/// ([`crate::pattern::PriceActionLabPattern::log_payoff_ratio`]), not the
/// plain `payoffRatio` the non-log policy uses — reusing either would
/// silently collapse this policy onto the non-log one.
#[derive(Debug, Clone, Copy)]
pub struct BootStrappedLogProfitabilityPfPolicy {
    pub min_trades: u32,
    pub min_bars: usize,
    pub target_log_profit_factor: f64,
    pub log_payoff_ratio: f64,
}

impl BootStrappedLogProfitabilityPfPolicy {
    pub fn new(log_payoff_ratio: f64) -> Self {
        BootStrappedLogProfitabilityPfPolicy {
            min_trades: 10,
            min_bars: 30,
            target_log_profit_factor: 2.0,
            log_payoff_ratio,
        }
    }

    fn expected_profitability(&self) -> f64 {
        (self.target_log_profit_factor / (self.target_log_profit_factor + self.log_payoff_ratio)) * 100.0
    }
}

fn log_win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let wins = returns.iter().filter(|r| (1.0 + *r).ln() > 0.0).count();
    (wins as f64 / returns.len() as f64) * 100.0
}

impl MonteCarloTestPolicy for BootStrappedLogProfitabilityPfPolicy {
    fn min_strategy_trades(&self) -> u32 {
        self.min_trades
    }
    fn min_bar_series_size(&self) -> usize {
        self.min_bars
    }
    fn compute_statistic(&self, returns: &[Decimal], executor: &AnyExecutor) -> f64 {
        if returns.iter().all(|r| r.is_zero()) {
            return 0.0;
        }
        let true_profitability = bca_lower_bound(returns, log_win_rate, executor);
        let true_log_pf = bca_lower_bound(returns, log_profit_factor, executor);

        let profitability_ratio = (true_profitability / self.expected_profitability()).min(1.0);
        let pf_ratio = (true_log_pf / self.target_log_profit_factor).min(1.5);
        profitability_ratio * pf_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::AnyExecutor;
    use crate::statistics::backtester::FixedReturnsBackTester;

    fn returns(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from_str_exact(v).unwrap()).collect()
    }

    #[test]
    fn all_zero_returns_yield_zero_statistic() {
        let bt = FixedReturnsBackTester::new_daily(returns(&["0", "0", "0"]), 50);
        let policy = BootStrappedProfitFactorPolicy {
            min_trades: 1,
            min_bars: 1,
        };
        let executor = AnyExecutor::single();
        let stat = policy.get_permutation_test_statistic(&bt, &executor);
        assert_eq!(stat, 0.0);
    }

    #[test]
    fn below_minimum_trades_returns_sentinel() {
        let bt = FixedReturnsBackTester::new_daily(returns(&["0.01", "0.02"]), 2);
        let policy = BootStrappedSharpeRatioPolicy {
            min_trades: 100,
            min_bars: 1,
        };
        let executor = AnyExecutor::single();
        assert_eq!(policy.get_permutation_test_statistic(&bt, &executor), FAILURE_SENTINEL);
    }

    #[test]
    fn profitability_pf_ratio_is_clipped_at_one_point_five() {
        let policy = BootStrappedProfitabilityPfPolicy::new(0.5);
        assert!(policy.target_profit_factor > 0.0);
        // A huge true PF should still clip at 1.5, not runaway.
        let ratio = (100.0_f64 / policy.target_profit_factor).min(1.5);
        assert_eq!(ratio, 1.5);
    }

    #[test]
    fn log_policy_expected_profitability_uses_the_log_target_and_ratio() {
        // A pattern whose plain payoff ratio is 2.0 but whose log-compressed
        // ratio differs (unequal-magnitude percentages), so the two
        // policies must disagree on `expectedProfitability`.
        let log_ratio = (1.0f64 + 0.20).ln() / (1.0f64 - 0.10).ln().abs();
        let plain_ratio = 0.20 / 0.10;
        assert!((log_ratio - plain_ratio).abs() > 1e-3);

        let log_policy = BootStrappedLogProfitabilityPfPolicy::new(log_ratio);
        let plain_policy = BootStrappedProfitabilityPfPolicy::new(plain_ratio);

        let log_expected = (log_policy.target_log_profit_factor
            / (log_policy.target_log_profit_factor + log_policy.log_payoff_ratio))
            * 100.0;
        let plain_expected = (plain_policy.target_profit_factor
            / (plain_policy.target_profit_factor + plain_policy.payoff_ratio))
            * 100.0;

        assert!(
            (log_expected - plain_expected).abs() > 1e-3,
            "log and plain expected-profitability formulas must not collapse to the same value"
        );
    }
}
