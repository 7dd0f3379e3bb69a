//! §4.E — BoundedDrawdowns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use super::bca::{bca_bootstrap, BcaResult, IntervalType};
use crate::decimal::Decimal;
use crate::error::BootstrapError;
use crate::executor::{AnyExecutor, Executor};
use crate::resampling::stationary::StationaryBlockResampler;

/// Maximum of (peak - equity) / peak along the compounded equity curve,
/// returned as a non-negative magnitude (§4.E, Scenario 1).
pub fn max_drawdown(returns: &[Decimal]) -> Decimal {
    let mut equity = Decimal::ONE;
    let mut peak = Decimal::ONE;
    let mut worst = Decimal::ZERO;
    for r in returns {
        equity = equity * (Decimal::ONE + *r);
        peak = peak.max(equity);
        if peak.is_zero() {
            continue;
        }
        let dd = (peak - equity) / peak;
        worst = worst.max(dd);
    }
    worst
}

fn quantile_of(mut values: Vec<f64>, p: f64) -> f64 {
    let idx = super::unbiased_index(p, values.len());
    values.select_nth_unstable_by(idx, |a, b| a.partial_cmp(b).unwrap());
    values[idx]
}

fn validate_fractile_inputs(
    returns: &[Decimal],
    n_trades: u32,
    n_reps: u32,
    p: f64,
) -> Result<(), BootstrapError> {
    if returns.is_empty() {
        return Err(BootstrapError::EmptyReturns);
    }
    if n_trades == 0 {
        return Err(BootstrapError::InvalidTradeCount);
    }
    if n_reps == 0 {
        return Err(BootstrapError::InvalidReplicateCount);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(BootstrapError::InvalidPercentile(p));
    }
    Ok(())
}

/// For each of `n_reps` replicates, builds a synthetic `n_trades`-long path
/// via IID resampling, computes its max drawdown, and returns the
/// `p`-quantile (§4.E).
pub fn drawdown_fractile(
    returns: &[Decimal],
    n_trades: u32,
    n_reps: u32,
    p: f64,
    seed: u64,
    executor: &AnyExecutor,
) -> Result<Decimal, BootstrapError> {
    validate_fractile_inputs(returns, n_trades, n_reps, p)?;

    let drawdowns = executor.parallel_for(n_reps as usize, |rep_index| {
        let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(rep_index as u64));
        let path: Vec<Decimal> = (0..n_trades)
            .map(|_| returns[rng.gen_range(0..returns.len())])
            .collect();
        max_drawdown(&path).to_f64()
    });

    Ok(Decimal::from_f64(quantile_of(drawdowns, p)).unwrap_or(Decimal::ZERO))
}

/// Same as [`drawdown_fractile`] but samples contiguous blocks via
/// [`StationaryBlockResampler`] to preserve dependence; falls back to IID
/// sampling when the input has fewer than 2 elements or `n_trades < 2`.
pub fn drawdown_fractile_stationary(
    returns: &[Decimal],
    n_trades: u32,
    n_reps: u32,
    p: f64,
    mean_block_length: u32,
    seed: u64,
    executor: &AnyExecutor,
) -> Result<Decimal, BootstrapError> {
    validate_fractile_inputs(returns, n_trades, n_reps, p)?;

    if returns.len() < 2 || n_trades < 2 {
        return drawdown_fractile(returns, n_trades, n_reps, p, seed, executor);
    }

    let resampler = StationaryBlockResampler::new(mean_block_length)
        .map_err(|_| BootstrapError::InvalidTradeCount)?;

    let drawdowns = executor.parallel_for(n_reps as usize, |rep_index| {
        let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(rep_index as u64));
        let mut path = Vec::new();
        resampler
            .resample(returns, &mut path, n_trades as usize, &mut rng)
            .expect("validated inputs cannot fail here");
        max_drawdown(&path).to_f64()
    });

    Ok(Decimal::from_f64(quantile_of(drawdowns, p)).unwrap_or(Decimal::ZERO))
}

/// Wraps a BCa confidence interval around [`drawdown_fractile_stationary`]
/// using the same stationary sampler both inside and outside the
/// bootstrap, so the statistic's dependence structure is preserved at
/// every level (§4.E).
#[allow(clippy::too_many_arguments)]
pub fn bca_bounds_for_drawdown_fractile(
    returns: &[Decimal],
    n_trades: u32,
    n_reps: u32,
    p: f64,
    mean_block_length: u32,
    bootstrap_replicates: u32,
    confidence_level: f64,
    interval: IntervalType,
    seed: u64,
    executor: &AnyExecutor,
) -> Result<BcaResult, BootstrapError> {
    validate_fractile_inputs(returns, n_trades, n_reps, p)?;

    let statistic = move |sample: &[f64]| -> f64 {
        let decimals: Vec<Decimal> = sample.iter().map(|v| Decimal::from_f64(*v).unwrap_or(Decimal::ZERO)).collect();
        drawdown_fractile_stationary(
            &decimals,
            n_trades,
            n_reps,
            p,
            mean_block_length,
            seed,
            &AnyExecutor::single(),
        )
        .map(|d| d.to_f64())
        .unwrap_or(f64::NAN)
    };

    let resampler = StationaryBlockResampler::new(mean_block_length)
        .map_err(|_| BootstrapError::InvalidTradeCount)?;
    let sample_len = returns.len();
    let sampler = move |src: &[f64], rep_index: usize| -> Vec<f64> {
        let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(0xA5A5_0000).wrapping_add(rep_index as u64));
        let mut out = Vec::new();
        resampler
            .resample(src, &mut out, sample_len, &mut rng)
            .expect("validated inputs cannot fail here");
        out
    };

    bca_bootstrap(
        returns,
        bootstrap_replicates,
        confidence_level,
        interval,
        statistic,
        sampler,
        executor,
    )
}
