//! §3.4 — PatternTemplate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::component::PriceComponentDescriptor;
use super::condition::PatternCondition;
use super::hash::hash_conditions;
use crate::error::PatternError;

/// An ordered sequence of conditions implicitly conjoined (AND). Two
/// templates are equal when they share a name *and* their conditions are a
/// permutation of each other — order matters for the name, not for the
/// condition set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTemplate {
    name: String,
    conditions: Vec<PatternCondition>,
    max_bar_offset: u8,
}

impl PatternTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        PatternTemplate {
            name: name.into(),
            conditions: Vec::new(),
            max_bar_offset: 0,
        }
    }

    pub fn with_conditions(name: impl Into<String>, conditions: Vec<PatternCondition>) -> Self {
        let mut t = PatternTemplate::new(name);
        for c in conditions {
            t.add_condition(c);
        }
        t
    }

    pub fn add_condition(&mut self, condition: PatternCondition) {
        self.max_bar_offset = self.max_bar_offset.max(condition.max_bar_offset());
        self.conditions.push(condition);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[PatternCondition] {
        &self.conditions
    }

    pub fn max_bar_offset(&self) -> u8 {
        self.max_bar_offset
    }

    pub fn num_unique_components(&self) -> usize {
        let mut set: HashSet<PriceComponentDescriptor> = HashSet::new();
        for c in &self.conditions {
            set.insert(c.lhs());
            set.insert(c.rhs());
        }
        set.len()
    }

    /// Canonical hash: sorts the conditions' hashes, then combines —
    /// independent of the order conditions were added in.
    pub fn canonical_hash(&self) -> u64 {
        hash_conditions(&self.conditions)
    }

    pub fn validate_non_empty(&self) -> Result<(), PatternError> {
        if self.conditions.is_empty() {
            Err(PatternError::EmptyTemplate)
        } else {
            Ok(())
        }
    }
}

impl PartialEq for PatternTemplate {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name || self.conditions.len() != other.conditions.len() {
            return false;
        }
        // Order-independent multiset comparison over the condition vectors:
        // mirrors the reference implementation's std::is_permutation check.
        let mut remaining: Vec<PatternCondition> = other.conditions.clone();
        for cond in &self.conditions {
            if let Some(pos) = remaining.iter().position(|c| c == cond) {
                remaining.remove(pos);
            } else {
                return false;
            }
        }
        true
    }
}

impl Eq for PatternTemplate {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::component::ComponentType;
    use crate::pattern::condition::ComparisonOperator;

    fn cond(lhs: ComponentType, l_off: u8, op: ComparisonOperator, rhs: ComponentType, r_off: u8) -> PatternCondition {
        PatternCondition::new(
            PriceComponentDescriptor::new(lhs, l_off),
            op,
            PriceComponentDescriptor::new(rhs, r_off),
        )
    }

    #[test]
    fn equality_is_order_independent_on_conditions_but_not_name() {
        let c0 = cond(ComponentType::Open, 1, ComparisonOperator::GreaterThan, ComponentType::Close, 0);
        let c1 = cond(ComponentType::Close, 1, ComparisonOperator::GreaterThan, ComponentType::Open, 0);

        let a = PatternTemplate::with_conditions("Engulfing-like", vec![c0, c1]);
        let b = PatternTemplate::with_conditions("Engulfing-like", vec![c1, c0]);
        assert_eq!(a, b);

        let c = PatternTemplate::with_conditions("Other name", vec![c0, c1]);
        assert_ne!(a, c);
    }

    #[test]
    fn max_bar_offset_tracks_largest_seen() {
        let mut t = PatternTemplate::new("t");
        t.add_condition(cond(ComponentType::Open, 3, ComparisonOperator::GreaterThan, ComponentType::Close, 1));
        t.add_condition(cond(ComponentType::High, 7, ComparisonOperator::GreaterThan, ComponentType::Low, 0));
        assert_eq!(t.max_bar_offset(), 7);
    }

    #[test]
    fn empty_template_fails_validation() {
        let t = PatternTemplate::new("empty");
        assert!(t.validate_non_empty().is_err());
    }
}
