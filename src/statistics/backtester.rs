//! §6.4 — Backtester Interface (consumed).
//!
//! The core never runs the event loop itself; it consumes whatever
//! produced a per-trade return series through this trait. Production code
//! supplies a real backtester; tests supply [`FixedReturnsBackTester`],
//! built directly from a `Vec<Decimal>`.

use crate::decimal::Decimal;

pub trait BackTester: Send + Sync {
    fn num_trades(&self) -> u32;
    fn all_high_res_returns(&self) -> Vec<Decimal>;
    fn is_daily_back_tester(&self) -> bool;
    fn is_intraday_back_tester(&self) -> bool;
    /// Must produce an independent, thread-safe copy (§6.4) — e.g. so the
    /// permutation driver (§4.F) can hand each worker thread its own copy
    /// seeded with a shuffled return series.
    fn clone_box(&self) -> Box<dyn BackTester>;
}

#[derive(Debug, Clone)]
pub struct FixedReturnsBackTester {
    returns: Vec<Decimal>,
    num_trades: u32,
    daily: bool,
}

impl FixedReturnsBackTester {
    pub fn new_daily(returns: Vec<Decimal>, num_trades: u32) -> Self {
        FixedReturnsBackTester {
            returns,
            num_trades,
            daily: true,
        }
    }

    pub fn new_intraday(returns: Vec<Decimal>, num_trades: u32) -> Self {
        FixedReturnsBackTester {
            returns,
            num_trades,
            daily: false,
        }
    }

    pub fn with_returns(&self, returns: Vec<Decimal>) -> Self {
        FixedReturnsBackTester {
            returns,
            num_trades: self.num_trades,
            daily: self.daily,
        }
    }
}

impl BackTester for FixedReturnsBackTester {
    fn num_trades(&self) -> u32 {
        self.num_trades
    }

    fn all_high_res_returns(&self) -> Vec<Decimal> {
        self.returns.clone()
    }

    fn is_daily_back_tester(&self) -> bool {
        self.daily
    }

    fn is_intraday_back_tester(&self) -> bool {
        !self.daily
    }

    fn clone_box(&self) -> Box<dyn BackTester> {
        Box::new(self.clone())
    }
}
