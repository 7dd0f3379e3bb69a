//! Literal end-to-end scenarios that exercise the public API across module
//! boundaries, rather than a single function in isolation.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use pal_research_core::bootstrap::bca::{bca_bootstrap, IntervalType};
use pal_research_core::decimal::{Decimal, TradingVolume, VolumeUnit};
use pal_research_core::error::PatternError;

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn iid_sampler(src: &[f64], seed_index: usize) -> Vec<f64> {
    let mut rng = Pcg64::seed_from_u64(seed_index as u64);
    (0..src.len()).map(|_| src[rng.gen_range(0..src.len())]).collect()
}

/// One-sided-upper bound for risk sizing: the upper bound must lie strictly
/// inside (0, 1) so `required_capital = 1 / (1 - upper_bound)` is finite,
/// and it must not fall below the two-sided upper bound by more than the
/// Monte-Carlo noise tolerance (invariant 4).
#[test]
fn scenario_4_one_sided_upper_bound_for_risk() {
    let executor = pal_research_core::executor::AnyExecutor::single();
    let mut rng = Pcg64::seed_from_u64(77);
    let returns: Vec<Decimal> = (0..15)
        .map(|_| Decimal::from_f64(rng.gen_range(-0.03..0.04)).unwrap())
        .collect();

    let upper_only = bca_bootstrap(
        &returns,
        900,
        0.95,
        IntervalType::OneSidedUpper,
        mean,
        iid_sampler,
        &executor,
    )
    .unwrap();

    let upper_f64 = upper_only.upper_bound.to_f64();
    assert!(upper_f64 > 0.0 && upper_f64 < 0.99, "upper bound {upper_f64} out of range");

    let required_capital = 1.0 / (1.0 - upper_f64);
    assert!(required_capital.is_finite());

    let two_sided = bca_bootstrap(
        &returns,
        900,
        0.95,
        IntervalType::TwoSided,
        mean,
        iid_sampler,
        &executor,
    )
    .unwrap();

    assert!(
        upper_only.upper_bound.to_f64() <= two_sided.upper_bound.to_f64() + 0.05,
        "one-sided upper bound should not exceed the two-sided upper bound beyond MC noise"
    );
}

/// Comparing trade sizes denominated in incompatible units is a domain
/// error, not a silent numeric comparison (invariant, §7 domain errors).
#[test]
fn scenario_5_trading_volume_unit_mismatch_is_a_domain_error() {
    let shares = TradingVolume::new(100_000, VolumeUnit::Shares);
    let contracts = TradingVolume::new(100_000, VolumeUnit::Contracts);

    let err = shares.try_cmp(&contracts).unwrap_err();
    match err {
        PatternError::IncompatibleUnits { lhs, rhs } => {
            assert_eq!(lhs, "shares");
            assert_eq!(rhs, "contracts");
        }
        other => panic!("expected IncompatibleUnits, got {other:?}"),
    }
}
