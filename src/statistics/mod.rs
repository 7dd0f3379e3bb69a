//! Statistic policies and the backtester interface they consume (§4.E, §6.4).

pub mod backtester;
pub mod policies;

pub use backtester::{BackTester, FixedReturnsBackTester};
pub use policies::{
    BootStrappedLogProfitFactorPolicy, BootStrappedLogProfitabilityPfPolicy, BootStrappedProfitFactorPolicy,
    BootStrappedProfitabilityPfPolicy, BootStrappedSharpeRatioPolicy, MonteCarloTestPolicy, FAILURE_SENTINEL,
};
