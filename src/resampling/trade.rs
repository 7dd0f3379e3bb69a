//! §3.6, §4.D — Trade and TradeFlatteningAdapter.

use crate::decimal::Decimal;

/// A closed position's full mark-to-market return sequence (§3.6). Treated
/// as the atomic resampling unit so within-trade dependence survives
/// resampling even though between-trade independence is assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    daily_returns: Vec<Decimal>,
}

impl Trade {
    pub fn new(daily_returns: Vec<Decimal>) -> Self {
        Trade { daily_returns }
    }

    pub fn daily_returns(&self) -> &[Decimal] {
        &self.daily_returns
    }

    pub fn duration(&self) -> usize {
        self.daily_returns.len()
    }

    /// Sum of daily returns, used as the ordering key (matches the
    /// reference `Trade::operator<`, which orders by summed return).
    pub fn summed_return(&self) -> Decimal {
        self.daily_returns
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc + *r)
    }
}

impl PartialOrd for Trade {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Trade {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.summed_return().cmp(&other.summed_return())
    }
}

/// Wraps a flat-vector statistic `F` so it can be applied to a vector of
/// [`Trade`]s by concatenating their daily returns before delegating
/// (§4.D). This is how trade-level resampling feeds the same statistic
/// functors the bar-level bootstrap uses.
pub struct TradeFlatteningAdapter<'a, F>
where
    F: Fn(&[Decimal]) -> Decimal,
{
    flat_statistic: &'a F,
}

impl<'a, F> TradeFlatteningAdapter<'a, F>
where
    F: Fn(&[Decimal]) -> Decimal,
{
    pub fn new(flat_statistic: &'a F) -> Self {
        TradeFlatteningAdapter { flat_statistic }
    }

    pub fn apply(&self, trades: &[Trade]) -> Decimal {
        let flattened: Vec<Decimal> = trades.iter().flat_map(|t| t.daily_returns().to_vec()).collect();
        (self.flat_statistic)(&flattened)
    }
}
