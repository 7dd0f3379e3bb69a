//! §3.3 — PatternCondition.

use serde::{Deserialize, Serialize};

use super::component::PriceComponentDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ComparisonOperator {
    GreaterThan = 0,
    LessThan = 1,
    GreaterThanOrEqual = 2,
    LessThanOrEqual = 3,
    Equal = 4,
    NotEqual = 5,
}

impl ComparisonOperator {
    pub fn from_u8(tag: u8) -> Option<Self> {
        use ComparisonOperator::*;
        match tag {
            0 => Some(GreaterThan),
            1 => Some(LessThan),
            2 => Some(GreaterThanOrEqual),
            3 => Some(LessThanOrEqual),
            4 => Some(Equal),
            5 => Some(NotEqual),
            _ => None,
        }
    }

    /// The operator obtained by swapping the operands, i.e. `a OP b == b.flip() OP a`.
    pub fn flip(self) -> Self {
        use ComparisonOperator::*;
        match self {
            GreaterThan => LessThan,
            LessThan => GreaterThan,
            GreaterThanOrEqual => LessThanOrEqual,
            LessThanOrEqual => GreaterThanOrEqual,
            Equal => Equal,
            NotEqual => NotEqual,
        }
    }
}

/// A triple (lhs, op, rhs). Two conditions are canonically equivalent when
/// their unordered {lhs, rhs} set and operator agree after a consistent
/// direction swap (see [`ComparisonOperator::flip`] and
/// [`super::hash::hash_pattern_condition`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternCondition {
    lhs: PriceComponentDescriptor,
    op: ComparisonOperator,
    rhs: PriceComponentDescriptor,
}

impl PatternCondition {
    pub fn new(
        lhs: PriceComponentDescriptor,
        op: ComparisonOperator,
        rhs: PriceComponentDescriptor,
    ) -> Self {
        PatternCondition { lhs, op, rhs }
    }

    pub fn lhs(&self) -> PriceComponentDescriptor {
        self.lhs
    }

    pub fn rhs(&self) -> PriceComponentDescriptor {
        self.rhs
    }

    pub fn op(&self) -> ComparisonOperator {
        self.op
    }

    pub fn max_bar_offset(&self) -> u8 {
        self.lhs.bar_offset().max(self.rhs.bar_offset())
    }

    /// Shifts every bar offset in this condition by `delay`, producing the
    /// condition for a `Delay(k)` derived template (§4.C).
    pub fn delayed(&self, delay: u8) -> Self {
        PatternCondition {
            lhs: PriceComponentDescriptor::new(
                self.lhs.component_type(),
                self.lhs.bar_offset().saturating_add(delay),
            ),
            op: self.op,
            rhs: PriceComponentDescriptor::new(
                self.rhs.component_type(),
                self.rhs.bar_offset().saturating_add(delay),
            ),
        }
    }

    /// True when lhs and rhs describe the same descriptor — trivially
    /// degenerate and rejected during universe generation (§4.C).
    pub fn is_degenerate(&self) -> bool {
        self.lhs == self.rhs
    }
}
