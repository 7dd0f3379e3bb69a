//! §4.F — Romano-Wolf stepdown, Holm-Romano-Wolf, and the trivial
//! unadjusted selection.

use std::collections::HashMap;

use tracing::warn;

use crate::error::CorrectionError;

/// One strategy entering a correction run: its name, baseline (observed)
/// statistic, and its permutation-null distribution (§4.F).
#[derive(Debug, Clone)]
pub struct StrategyStatistic {
    pub name: String,
    pub baseline_stat: f64,
    pub null: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionResult {
    pub name: String,
    pub baseline_stat: f64,
    pub adjusted_p: f64,
    pub survived: bool,
}

/// The raw empirical p-value with continuity correction, as specified for
/// `addStrategy`'s provisional insertion value: `(#{null >= stat} + 1) /
/// (B + 1)`.
pub fn raw_p_value_smoothed(test_stat: f64, null: &[f64]) -> f64 {
    if null.is_empty() {
        return 1.0;
    }
    let count = null.iter().filter(|n| **n >= test_stat).count();
    (count as f64 + 1.0) / (null.len() as f64 + 1.0)
}

/// Plain empirical tail probability against a family-max null, used inside
/// each Romano-Wolf stepdown iteration.
fn family_max_p_value(test_stat: f64, family_max_null: &[f64]) -> f64 {
    if family_max_null.is_empty() {
        return 1.0;
    }
    let count = family_max_null.iter().filter(|n| **n >= test_stat).count();
    count as f64 / family_max_null.len() as f64
}

fn elementwise_max(nulls: &[&Vec<f64>]) -> Vec<f64> {
    let len = nulls.iter().map(|n| n.len()).min().unwrap_or(0);
    (0..len)
        .map(|i| nulls.iter().map(|n| n[i]).fold(f64::NEG_INFINITY, f64::max))
        .collect()
}

fn validate_alpha(alpha: f64) -> Result<(), CorrectionError> {
    if !(0.0..1.0).contains(&alpha) {
        return Err(CorrectionError::InvalidAlpha(alpha));
    }
    Ok(())
}

fn validate_strategies(strategies: &[StrategyStatistic]) -> Result<(), CorrectionError> {
    if strategies.is_empty() {
        return Err(CorrectionError::NoStrategies);
    }
    Ok(())
}

/// Full, step-down Romano-Wolf procedure (§4.F):
/// 1. sort by baseline statistic descending,
/// 2. at each step compute the family-max null over the strategies not yet
///    removed, reject the strongest remaining strategy at that null,
/// 3. remove it and recurse over the remainder,
/// 4. enforce that adjusted p-values are non-decreasing along the sorted
///    order.
pub fn romano_wolf_stepdown(
    strategies: &[StrategyStatistic],
    alpha: f64,
) -> Result<Vec<CorrectionResult>, CorrectionError> {
    validate_strategies(strategies)?;
    validate_alpha(alpha)?;

    if strategies.iter().any(|s| s.null.is_empty()) {
        warn!("empty synthetic null for at least one strategy; falling back to raw p-values");
        let mut out: Vec<CorrectionResult> = strategies
            .iter()
            .map(|s| CorrectionResult {
                name: s.name.clone(),
                baseline_stat: s.baseline_stat,
                adjusted_p: raw_p_value_smoothed(s.baseline_stat, &s.null),
                survived: false,
            })
            .collect();
        out.sort_by(|a, b| b.baseline_stat.partial_cmp(&a.baseline_stat).unwrap());
        enforce_monotonicity(&mut out);
        for r in out.iter_mut() {
            r.survived = r.adjusted_p < alpha;
        }
        return Ok(out);
    }

    let mut sorted: Vec<&StrategyStatistic> = strategies.iter().collect();
    sorted.sort_by(|a, b| b.baseline_stat.partial_cmp(&a.baseline_stat).unwrap());

    let mut results = Vec::with_capacity(sorted.len());
    for i in 0..sorted.len() {
        let remaining_nulls: Vec<&Vec<f64>> = sorted[i..].iter().map(|s| &s.null).collect();
        let family_max_null = elementwise_max(&remaining_nulls);
        let p = family_max_p_value(sorted[i].baseline_stat, &family_max_null);
        results.push(CorrectionResult {
            name: sorted[i].name.clone(),
            baseline_stat: sorted[i].baseline_stat,
            adjusted_p: p,
            survived: false,
        });
    }

    enforce_monotonicity(&mut results);
    for r in results.iter_mut() {
        r.survived = r.adjusted_p < alpha;
    }
    Ok(results)
}

/// Enforces invariant #7 (§8): adjusted p-values must be non-decreasing
/// along the sorted (baseline-descending) order. Propagates the running
/// maximum downward.
fn enforce_monotonicity(results: &mut [CorrectionResult]) {
    let mut running_max = 0.0f64;
    for r in results.iter_mut() {
        running_max = running_max.max(r.adjusted_p);
        r.adjusted_p = running_max;
    }
}

/// Approximates Romano-Wolf using only marginal (per-strategy) nulls:
/// `p_(i)^adj = max_{k<=i} min(1, (m-k+1) * p_(k))`, with the same
/// monotonicity enforcement (§4.F).
pub fn holm_romano_wolf(
    strategies: &[StrategyStatistic],
    alpha: f64,
) -> Result<Vec<CorrectionResult>, CorrectionError> {
    validate_strategies(strategies)?;
    validate_alpha(alpha)?;

    let mut sorted: Vec<&StrategyStatistic> = strategies.iter().collect();
    sorted.sort_by(|a, b| b.baseline_stat.partial_cmp(&a.baseline_stat).unwrap());
    let m = sorted.len();

    let marginal_p: Vec<f64> = sorted
        .iter()
        .map(|s| raw_p_value_smoothed(s.baseline_stat, &s.null))
        .collect();

    let mut running_max = 0.0f64;
    let mut results = Vec::with_capacity(m);
    for (k, s) in sorted.iter().enumerate() {
        let holm_term = (1.0_f64).min((m - k) as f64 * marginal_p[k]);
        running_max = running_max.max(holm_term);
        results.push(CorrectionResult {
            name: s.name.clone(),
            baseline_stat: s.baseline_stat,
            adjusted_p: running_max,
            survived: running_max < alpha,
        });
    }
    Ok(results)
}

/// Trivial selection: survivors are `{strategy : p < alpha}` against the
/// raw (uncorrected) p-value.
pub fn unadjusted_p_value_selection(
    strategies: &[StrategyStatistic],
    alpha: f64,
) -> Result<Vec<CorrectionResult>, CorrectionError> {
    validate_strategies(strategies)?;
    validate_alpha(alpha)?;

    Ok(strategies
        .iter()
        .map(|s| {
            let p = raw_p_value_smoothed(s.baseline_stat, &s.null);
            CorrectionResult {
                name: s.name.clone(),
                baseline_stat: s.baseline_stat,
                adjusted_p: p,
                survived: p < alpha,
            }
        })
        .collect())
}

pub fn survivors_by_name(results: &[CorrectionResult]) -> HashMap<String, bool> {
    results.iter().map(|r| (r.name.clone(), r.survived)).collect()
}
