//! §3.5 — PriceActionLabPattern (executable form).

use std::rc::Rc;

use chrono::NaiveDate;

use super::ast::{PatternExpression, VolatilityAttribute};
use crate::decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSide {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketEntry {
    side: MarketSide,
}

impl MarketEntry {
    pub fn long_on_open() -> Self {
        MarketEntry {
            side: MarketSide::Long,
        }
    }

    pub fn short_on_open() -> Self {
        MarketEntry {
            side: MarketSide::Short,
        }
    }

    pub fn side(&self) -> MarketSide {
        self.side
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitTarget {
    side: MarketSide,
    percent: Decimal,
}

impl ProfitTarget {
    pub fn new(side: MarketSide, percent: Decimal) -> Self {
        ProfitTarget { side, percent }
    }

    pub fn percent(&self) -> Decimal {
        self.percent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopLoss {
    side: MarketSide,
    percent: Decimal,
}

impl StopLoss {
    pub fn new(side: MarketSide, percent: Decimal) -> Self {
        StopLoss { side, percent }
    }

    pub fn percent(&self) -> Decimal {
        self.percent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioAttribute {
    None,
    Long,
    Short,
}

/// Provenance and population-level metadata carried alongside the
/// executable pattern (§3.5): which file/index it came from and the
/// historical trade stats the discovery pipeline recorded for it.
#[derive(Debug, Clone)]
pub struct PatternDescription {
    pub source_file: String,
    pub pattern_index: u32,
    pub index_date: NaiveDate,
    pub long_percent: Decimal,
    pub short_percent: Decimal,
    pub num_trades: u32,
    pub consecutive_losses: u32,
}

/// Combines a PatternTemplate-equivalent expression tree with the
/// entry/target/stop and bookkeeping metadata needed to run it. Immutable
/// after construction and shared (via `Rc`) across every strategy that
/// references it, since the AST subtrees underneath it may themselves be
/// interned and shared by the [`super::ast::AstFactory`].
#[derive(Debug, Clone)]
pub struct PriceActionLabPattern {
    description: Rc<PatternDescription>,
    expression: Rc<PatternExpression>,
    entry: MarketEntry,
    profit_target: ProfitTarget,
    stop_loss: StopLoss,
    volatility: VolatilityAttribute,
    portfolio_attribute: PortfolioAttribute,
}

impl PriceActionLabPattern {
    pub fn new(
        description: Rc<PatternDescription>,
        expression: Rc<PatternExpression>,
        entry: MarketEntry,
        profit_target: ProfitTarget,
        stop_loss: StopLoss,
    ) -> Self {
        PriceActionLabPattern {
            description,
            expression,
            entry,
            profit_target,
            stop_loss,
            volatility: VolatilityAttribute::None,
            portfolio_attribute: PortfolioAttribute::None,
        }
    }

    pub fn with_volatility(mut self, volatility: VolatilityAttribute) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn with_portfolio_attribute(mut self, attribute: PortfolioAttribute) -> Self {
        self.portfolio_attribute = attribute;
        self
    }

    pub fn description(&self) -> &PatternDescription {
        &self.description
    }

    pub fn expression(&self) -> &Rc<PatternExpression> {
        &self.expression
    }

    pub fn entry(&self) -> MarketEntry {
        self.entry
    }

    pub fn profit_target(&self) -> ProfitTarget {
        self.profit_target
    }

    pub fn stop_loss(&self) -> StopLoss {
        self.stop_loss
    }

    pub fn volatility(&self) -> VolatilityAttribute {
        self.volatility
    }

    pub fn portfolio_attribute(&self) -> PortfolioAttribute {
        self.portfolio_attribute
    }

    pub fn side(&self) -> MarketSide {
        self.entry.side()
    }

    /// `payoffRatio = profitTarget / stopLoss`, both expressed as decimal
    /// percent fractions (§3.5, used by `BootStrappedProfitabilityPF`).
    pub fn payoff_ratio(&self) -> Decimal {
        self.profit_target.percent() / self.stop_loss.percent()
    }

    /// `log(1+profitTarget) / |log(1-stopLoss)|`, the win/loss ratio used by
    /// `BootStrappedLogProfitabilityPF` (§4.E). Distinct from
    /// [`Self::payoff_ratio`]: the log transform compresses the target and
    /// stop percentages before dividing, rather than dividing the raw
    /// percentages directly.
    pub fn log_payoff_ratio(&self) -> f64 {
        let pt = self.profit_target.percent().to_f64() / 100.0;
        let sl = self.stop_loss.percent().to_f64() / 100.0;
        let log_win = (1.0 + pt).ln();
        let log_loss = (1.0 - sl).ln().abs();
        log_win / log_loss
    }

    pub fn max_bars_back(&self) -> Result<u16, crate::error::PatternError> {
        super::ast::evaluate_max_bars(&self.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ast::{AstFactory, PatternExpression};
    use crate::pattern::component::ComponentType;

    fn sample_pattern(pt_pct: &str, sl_pct: &str) -> PriceActionLabPattern {
        let factory = AstFactory::new();
        let expr = Rc::new(PatternExpression::greater_than(
            factory.price_bar_reference(ComponentType::Close, 0),
            factory.price_bar_reference(ComponentType::Open, 1),
        ));
        let description = Rc::new(PatternDescription {
            source_file: "sample.txt".to_string(),
            pattern_index: 1,
            index_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            long_percent: Decimal::from_i64(60),
            short_percent: Decimal::from_i64(40),
            num_trades: 100,
            consecutive_losses: 3,
        });
        PriceActionLabPattern::new(
            description,
            expr,
            MarketEntry::long_on_open(),
            ProfitTarget::new(MarketSide::Long, Decimal::from_str_exact(pt_pct).unwrap()),
            StopLoss::new(MarketSide::Long, Decimal::from_str_exact(sl_pct).unwrap()),
        )
    }

    #[test]
    fn payoff_ratio_divides_target_by_stop() {
        let pattern = sample_pattern("2.0", "1.0");
        assert_eq!(pattern.payoff_ratio(), Decimal::from_i64(2));
    }

    #[test]
    fn max_bars_back_delegates_to_ast() {
        let pattern = sample_pattern("2.0", "1.0");
        assert_eq!(pattern.max_bars_back().unwrap(), 1);
    }

    #[test]
    fn log_payoff_ratio_uses_log_compressed_percentages() {
        let pattern = sample_pattern("2.0", "1.0");
        let expected = (1.0f64 + 0.02).ln() / (1.0f64 - 0.01).ln().abs();
        assert!((pattern.log_payoff_ratio() - expected).abs() < 1e-12);
        // Distinct from the plain ratio: log-compressing unequal percentages
        // does not divide out to the same value as the raw ratio.
        assert!((pattern.log_payoff_ratio() - pattern.payoff_ratio().to_f64()).abs() > 1e-6);
    }
}
