//! Component A — Decimal/Numeric Layer.
//!
//! A thin newtype over [`rust_decimal::Decimal`] so the rest of the crate
//! consumes a single `Decimal` type without depending on the backing
//! representation. `rust_decimal` gives exact base-10 arithmetic, so a CSV
//! price string round-trips without the float drift a quant pipeline can't
//! tolerate.

use rust_decimal::prelude::*;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal(rust_decimal::Decimal);

impl Decimal {
    pub const ZERO: Decimal = Decimal(rust_decimal::Decimal::ZERO);
    pub const ONE: Decimal = Decimal(rust_decimal::Decimal::ONE);

    pub fn from_i64(value: i64) -> Self {
        Decimal(rust_decimal::Decimal::from(value))
    }

    /// Parses a decimal string the same way regardless of locale.
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        rust_decimal::Decimal::from_str(s).map(Decimal)
    }

    pub fn abs(self) -> Self {
        Decimal(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_sign_negative(self) -> bool {
        self.0.is_sign_negative()
    }

    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// The single seam where this layer drops to `f64`: statistics needing
    /// `ln`/`sqrt`/`Φ⁻¹` have no native decimal implementation.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    pub fn from_f64(value: f64) -> Option<Self> {
        rust_decimal::Decimal::from_f64(value).map(Decimal)
    }

    /// Interprets `self` as a percent fraction (e.g. 0.02 == 2%) and applies
    /// it to `base`, i.e. `base * (1 + self)`.
    pub fn apply_as_return(self, base: Decimal) -> Decimal {
        base * (Decimal::ONE + self)
    }

    /// `self` expressed as a percentage of `whole`, e.g. `percent_of(50, 200) == 25`.
    pub fn percent_of(self, whole: Decimal) -> Decimal {
        if whole.is_zero() {
            Decimal::ZERO
        } else {
            self / whole * Decimal::from_i64(100)
        }
    }

    pub fn inner(self) -> rust_decimal::Decimal {
        self.0
    }
}

impl From<rust_decimal::Decimal> for Decimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Decimal(value)
    }
}

impl Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Self) -> Self::Output {
        Decimal(self.0 + rhs.0)
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Self) -> Self::Output {
        Decimal(self.0 - rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Self) -> Self::Output {
        Decimal(self.0 * rhs.0)
    }
}

impl Div for Decimal {
    type Output = Decimal;
    fn div(self, rhs: Self) -> Self::Output {
        Decimal(self.0 / rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Self::Output {
        Decimal(-self.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[macro_export]
macro_rules! dec {
    ($value:expr) => {
        $crate::decimal::Decimal::from(rust_decimal_macros::dec!($value))
    };
}

/// Volume unit a [`TradingVolume`] is denominated in. Shares and contracts
/// are not fungible quantities, so comparing across units is a domain
/// error rather than a silent numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeUnit {
    Shares,
    Contracts,
}

/// A trade size tagged with its unit (§7's domain-error taxonomy). Ordering
/// between two volumes is only defined when both share a unit; comparing
/// across units raises [`crate::error::PatternError::IncompatibleUnits`]
/// rather than comparing the raw magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradingVolume {
    volume: u64,
    unit: VolumeUnit,
}

impl TradingVolume {
    pub const fn new(volume: u64, unit: VolumeUnit) -> Self {
        TradingVolume { volume, unit }
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn unit(&self) -> VolumeUnit {
        self.unit
    }

    fn unit_name(unit: VolumeUnit) -> &'static str {
        match unit {
            VolumeUnit::Shares => "shares",
            VolumeUnit::Contracts => "contracts",
        }
    }

    /// Fallible ordering: `Ok` only when both sides share a unit.
    pub fn try_cmp(&self, other: &Self) -> Result<std::cmp::Ordering, crate::error::PatternError> {
        if self.unit == other.unit {
            Ok(self.volume.cmp(&other.volume))
        } else {
            Err(crate::error::PatternError::IncompatibleUnits {
                lhs: Self::unit_name(self.unit).to_string(),
                rhs: Self::unit_name(other.unit).to_string(),
            })
        }
    }

    pub fn try_lt(&self, other: &Self) -> Result<bool, crate::error::PatternError> {
        self.try_cmp(other).map(|o| o == std::cmp::Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_independent_parsing() {
        let a = Decimal::from_str_exact("1.23").unwrap();
        let b = Decimal::from_str_exact("1.230").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn arithmetic_round_trips_exactly() {
        let a = Decimal::from_str_exact("0.1").unwrap();
        let b = Decimal::from_str_exact("0.2").unwrap();
        assert_eq!((a + b).to_string(), "0.3");
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        let a = Decimal::from_i64(5);
        assert_eq!(a.percent_of(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn same_unit_volumes_compare_by_magnitude() {
        let a = TradingVolume::new(100, VolumeUnit::Shares);
        let b = TradingVolume::new(200, VolumeUnit::Shares);
        assert!(a.try_lt(&b).unwrap());
    }

    #[test]
    fn mismatched_unit_comparison_is_a_domain_error() {
        let shares = TradingVolume::new(100_000, VolumeUnit::Shares);
        let contracts = TradingVolume::new(100_000, VolumeUnit::Contracts);
        let err = shares.try_cmp(&contracts).unwrap_err();
        assert_eq!(
            err,
            crate::error::PatternError::IncompatibleUnits {
                lhs: "shares".to_string(),
                rhs: "contracts".to_string(),
            }
        );
    }
}
