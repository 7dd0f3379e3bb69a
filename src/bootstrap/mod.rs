//! Component E — Bootstrap & Bounded Drawdowns (§4.E).

pub mod bca;
pub mod drawdown;

pub use bca::{annualize, bca_bootstrap, BcaResult, IntervalType};
pub use drawdown::{bca_bounds_for_drawdown_fractile, drawdown_fractile, drawdown_fractile_stationary, max_drawdown};

/// Percentile index helper matching the convention used throughout BCa and
/// the bounded-drawdown fractiles: `floor(p*(B+1)) - 1`, clamped into
/// `[0, B-1]`. Shared by [`bca`] and [`drawdown`] so the two never drift.
pub(crate) fn unbiased_index(p: f64, b: usize) -> usize {
    let idx = (p * (b as f64 + 1.0)).floor() as isize - 1;
    idx.clamp(0, b as isize - 1) as usize
}
