//! §3.2 — PriceComponentDescriptor.

use serde::{Deserialize, Serialize};

/// One of the price-bar quantities a pattern condition can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ComponentType {
    Open = 0,
    High = 1,
    Low = 2,
    Close = 3,
    Volume = 4,
    Roc1 = 5,
    Ibs1 = 6,
    Ibs2 = 7,
    Ibs3 = 8,
    Meander = 9,
    VChartLow = 10,
    VChartHigh = 11,
}

impl ComponentType {
    pub const ALL: [ComponentType; 12] = [
        ComponentType::Open,
        ComponentType::High,
        ComponentType::Low,
        ComponentType::Close,
        ComponentType::Volume,
        ComponentType::Roc1,
        ComponentType::Ibs1,
        ComponentType::Ibs2,
        ComponentType::Ibs3,
        ComponentType::Meander,
        ComponentType::VChartLow,
        ComponentType::VChartHigh,
    ];

    /// Extra historical bars a derived component needs beyond its own offset.
    pub fn extra_bars_needed(self) -> u8 {
        match self {
            ComponentType::Roc1 | ComponentType::Ibs2 => 1,
            ComponentType::Ibs3 => 2,
            ComponentType::Meander => 5,
            ComponentType::VChartLow | ComponentType::VChartHigh => 6,
            _ => 0,
        }
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| *c as u8 == tag)
    }
}

/// An (ComponentType, BarOffset) pair. BarOffset 0 is the current bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriceComponentDescriptor {
    component_type: ComponentType,
    bar_offset: u8,
}

impl PriceComponentDescriptor {
    pub fn new(component_type: ComponentType, bar_offset: u8) -> Self {
        PriceComponentDescriptor {
            component_type,
            bar_offset,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn bar_offset(&self) -> u8 {
        self.bar_offset
    }

    pub fn extra_bars_needed(&self) -> u8 {
        self.component_type.extra_bars_needed()
    }

    /// Total lookback this single descriptor requires.
    pub fn required_lookback(&self) -> u16 {
        self.bar_offset as u16 + self.extra_bars_needed() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_components_carry_extra_bars() {
        assert_eq!(ComponentType::Roc1.extra_bars_needed(), 1);
        assert_eq!(ComponentType::Meander.extra_bars_needed(), 5);
        assert_eq!(ComponentType::Close.extra_bars_needed(), 0);
    }

    #[test]
    fn required_lookback_adds_offset_and_extra() {
        let d = PriceComponentDescriptor::new(ComponentType::VChartHigh, 3);
        assert_eq!(d.required_lookback(), 9);
    }

    #[test]
    fn ordering_is_by_derive_order() {
        let a = PriceComponentDescriptor::new(ComponentType::Open, 5);
        let b = PriceComponentDescriptor::new(ComponentType::Open, 5);
        assert_eq!(a, b);
    }
}
