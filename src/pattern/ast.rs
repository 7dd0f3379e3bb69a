//! §4.B — Pattern AST & Factory.
//!
//! `ComponentType`/`ComparisonOperator` are the closed tagged sums (per the
//! design notes' preference for enums over dynamic dispatch where the set
//! of variants is closed); the expression tree itself is a small recursive
//! enum rather than a trait-object hierarchy, since `GreaterThanExpr` and
//! `AndExpr` are the only two node shapes that ever appear.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::component::{ComponentType, PriceComponentDescriptor};
use super::hash::{hash_combine, hash_price_component_descriptor};
use crate::decimal::Decimal;
use crate::error::PatternError;

/// A leaf reference to a price-bar component at a given offset. Caches its
/// hash on first computation (the source's `hashCode` cache), though in
/// practice the combinatorics here are cheap enough that the cache mostly
/// documents intent.
#[derive(Debug, Clone)]
pub struct PriceBarReference {
    descriptor: PriceComponentDescriptor,
    cached_hash: Cell<Option<u64>>,
}

impl PriceBarReference {
    pub fn new(component_type: ComponentType, bar_offset: u8) -> Self {
        PriceBarReference {
            descriptor: PriceComponentDescriptor::new(component_type, bar_offset),
            cached_hash: Cell::new(None),
        }
    }

    pub fn bar_offset(&self) -> u8 {
        self.descriptor.bar_offset()
    }

    pub fn reference_type(&self) -> ComponentType {
        self.descriptor.component_type()
    }

    pub fn extra_bars_needed(&self) -> u8 {
        self.descriptor.extra_bars_needed()
    }

    pub fn hash_code(&self) -> u64 {
        if let Some(h) = self.cached_hash.get() {
            return h;
        }
        let h = hash_price_component_descriptor(&self.descriptor);
        self.cached_hash.set(Some(h));
        h
    }
}

/// Long/short side of a market-entry, profit-target or stop-loss leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

/// The pattern expression tree: a sum-of-conjunctions boolean expression.
/// `GreaterThanExpr` is the only comparison leaf (the universe generator
/// never emits `<`/`>=`/etc. nodes directly — those are expressed as a
/// `GreaterThanExpr` with operands swapped, matching the canonical-hash
/// direction-swap rule in §4.B).
#[derive(Debug, Clone)]
pub enum PatternExpression {
    GreaterThan {
        lhs: Rc<PriceBarReference>,
        rhs: Rc<PriceBarReference>,
        cached_hash: Cell<Option<u64>>,
    },
    And {
        lhs: Rc<PatternExpression>,
        rhs: Rc<PatternExpression>,
        cached_hash: Cell<Option<u64>>,
    },
}

impl PatternExpression {
    pub fn greater_than(lhs: Rc<PriceBarReference>, rhs: Rc<PriceBarReference>) -> Self {
        PatternExpression::GreaterThan {
            lhs,
            rhs,
            cached_hash: Cell::new(None),
        }
    }

    pub fn and(lhs: Rc<PatternExpression>, rhs: Rc<PatternExpression>) -> Self {
        PatternExpression::And {
            lhs,
            rhs,
            cached_hash: Cell::new(None),
        }
    }

    pub fn hash_code(&self) -> u64 {
        match self {
            PatternExpression::GreaterThan {
                lhs,
                rhs,
                cached_hash,
            } => {
                if let Some(h) = cached_hash.get() {
                    return h;
                }
                let h1 = lhs.hash_code();
                let h2 = rhs.hash_code();
                let mut seed = 0u64;
                hash_combine(&mut seed, h1.min(h2));
                hash_combine(&mut seed, h1.max(h2));
                cached_hash.set(Some(seed));
                seed
            }
            PatternExpression::And {
                lhs,
                rhs,
                cached_hash,
            } => {
                if let Some(h) = cached_hash.get() {
                    return h;
                }
                let mut seed = lhs.hash_code();
                hash_combine(&mut seed, rhs.hash_code());
                cached_hash.set(Some(seed));
                seed
            }
        }
    }
}

/// `evaluateMaxBars` (§4.B): walks the tree computing the deepest lookback
/// any leaf requires. Unknown node shapes fail with a domain error — in
/// this closed enum that can only happen if a future variant is added
/// without updating this match, so the error arm documents the invariant
/// rather than being practically reachable.
pub fn evaluate_max_bars(expr: &PatternExpression) -> Result<u16, PatternError> {
    match expr {
        PatternExpression::GreaterThan { lhs, rhs, .. } => {
            let l = lhs.bar_offset() as u16 + lhs.extra_bars_needed() as u16;
            let r = rhs.bar_offset() as u16 + rhs.extra_bars_needed() as u16;
            Ok(l.max(r))
        }
        PatternExpression::And { lhs, rhs, .. } => {
            let l = evaluate_max_bars(lhs)?;
            let r = evaluate_max_bars(rhs)?;
            Ok(l.max(r))
        }
    }
}

/// Declared volatility attribute used by the tie-breaker (§4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VolatilityAttribute {
    None,
    Low,
    Normal,
    High,
    VeryHigh,
}

/// Prefers the pattern with strictly lower declared volatility when two
/// patterns share a semantic hash; `VolatilityAttribute::None` always loses
/// to any declared volatility, and a genuine tie defers to whichever
/// pattern was seen first.
pub fn smallest_volatility_tie_break<'a, T>(
    incumbent: &'a T,
    incumbent_vol: VolatilityAttribute,
    challenger: &'a T,
    challenger_vol: VolatilityAttribute,
) -> &'a T {
    use VolatilityAttribute::None as NoVol;
    match (incumbent_vol, challenger_vol) {
        (NoVol, NoVol) => incumbent,
        (NoVol, _) => challenger,
        (_, NoVol) => incumbent,
        (a, b) if b < a => challenger,
        _ => incumbent,
    }
}

const MAX_NUM_BAR_OFFSETS: u8 = 16;

/// Interns primitive leaves — `PriceOpen/High/Low/Close` for offsets
/// `0..MAX_NUM_BAR_OFFSETS`, long/short market-entry singletons, and small
/// decimal constants for profit/stop targets. Requests outside the
/// pre-populated range fall back to fresh, uninterned nodes. Population
/// happens once at construction; afterward the cache is read-only and safe
/// to share across producer threads (§4.B's factory contract, §5's shared
/// resource rule).
pub struct AstFactory {
    interned_refs: HashMap<(ComponentType, u8), Rc<PriceBarReference>>,
    interned_decimals: HashMap<Decimal, Rc<Decimal>>,
}

impl AstFactory {
    pub fn new() -> Self {
        let mut interned_refs = HashMap::new();
        for ct in [
            ComponentType::Open,
            ComponentType::High,
            ComponentType::Low,
            ComponentType::Close,
        ] {
            for offset in 0..MAX_NUM_BAR_OFFSETS {
                interned_refs.insert((ct, offset), Rc::new(PriceBarReference::new(ct, offset)));
            }
        }
        AstFactory {
            interned_refs,
            interned_decimals: HashMap::new(),
        }
    }

    pub fn price_bar_reference(&self, component_type: ComponentType, bar_offset: u8) -> Rc<PriceBarReference> {
        if let Some(cached) = self.interned_refs.get(&(component_type, bar_offset)) {
            return Rc::clone(cached);
        }
        Rc::new(PriceBarReference::new(component_type, bar_offset))
    }

    /// Interns small constants so repeated profit-target/stop-loss literals
    /// share one allocation; called only during construction in the
    /// single-writer phase described by §4.B's factory contract.
    pub fn intern_decimal(&mut self, value: Decimal) -> Rc<Decimal> {
        Rc::clone(
            self.interned_decimals
                .entry(value)
                .or_insert_with(|| Rc::new(value)),
        )
    }
}

impl Default for AstFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_interns_within_range_but_not_beyond() {
        let factory = AstFactory::new();
        let a = factory.price_bar_reference(ComponentType::Close, 2);
        let b = factory.price_bar_reference(ComponentType::Close, 2);
        assert!(Rc::ptr_eq(&a, &b));

        let c = factory.price_bar_reference(ComponentType::Close, 200);
        let d = factory.price_bar_reference(ComponentType::Close, 200);
        assert!(!Rc::ptr_eq(&c, &d));
    }

    #[test]
    fn evaluate_max_bars_accounts_for_extra_bars() {
        let factory = AstFactory::new();
        let meander = Rc::new(PriceBarReference::new(ComponentType::Meander, 2));
        let close0 = factory.price_bar_reference(ComponentType::Close, 0);
        let expr = PatternExpression::greater_than(meander, close0);
        // Meander needs 5 extra bars: 2 + 5 = 7.
        assert_eq!(evaluate_max_bars(&expr).unwrap(), 7);
    }

    #[test]
    fn and_expr_takes_the_deeper_branch() {
        let factory = AstFactory::new();
        let shallow = PatternExpression::greater_than(
            factory.price_bar_reference(ComponentType::Open, 1),
            factory.price_bar_reference(ComponentType::Close, 0),
        );
        let deep = PatternExpression::greater_than(
            factory.price_bar_reference(ComponentType::High, 9),
            factory.price_bar_reference(ComponentType::Low, 0),
        );
        let conj = PatternExpression::and(Rc::new(shallow), Rc::new(deep));
        assert_eq!(evaluate_max_bars(&conj).unwrap(), 9);
    }

    #[test]
    fn tie_break_prefers_lower_volatility_unless_none() {
        let a = "pattern-a";
        let b = "pattern-b";
        assert_eq!(
            smallest_volatility_tie_break(&a, VolatilityAttribute::None, &b, VolatilityAttribute::Low),
            &b
        );
        assert_eq!(
            smallest_volatility_tie_break(&a, VolatilityAttribute::Low, &b, VolatilityAttribute::High),
            &a
        );
        assert_eq!(
            smallest_volatility_tie_break(&a, VolatilityAttribute::Normal, &b, VolatilityAttribute::Normal),
            &a
        );
    }
}
