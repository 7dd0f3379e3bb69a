//! Canonical hashing (§4.B, §4.C). A direct port of the reference
//! generator's `hash_combine` + `std::hash<PriceComponentDescriptor/
//! PatternCondition/PatternTemplate>` specializations: components mix their
//! type tag and offset, conditions order {lhs_hash, rhs_hash} before mixing
//! in the operator so a direction swap with a consistent op flip collides,
//! and templates sort all condition hashes before combining so condition
//! order never affects the result.

use super::component::PriceComponentDescriptor;
use super::condition::PatternCondition;

/// Boost-style combiner: `seed ^= value + 0x9e3779b97f4a7c15 + (seed<<6) + (seed>>2)`.
pub fn hash_combine(seed: &mut u64, value: u64) {
    *seed ^= value
        .wrapping_add(0x9e3779b97f4a7c15)
        .wrapping_add(seed.wrapping_shl(6))
        .wrapping_add(seed.wrapping_shr(2));
}

pub fn hash_price_component_descriptor(d: &PriceComponentDescriptor) -> u64 {
    let mut seed = 0u64;
    hash_combine(&mut seed, d.component_type() as u64);
    hash_combine(&mut seed, d.bar_offset() as u64);
    seed
}

pub fn hash_pattern_condition(c: &PatternCondition) -> u64 {
    let h1 = hash_price_component_descriptor(&c.lhs());
    let h2 = hash_price_component_descriptor(&c.rhs());
    // Canonicalize the operator to whichever direction the operand hashes
    // would sort to, so a direction swap with the matching op flip always
    // produces the same seed (e.g. `a > b` and `b < a` must collide).
    let canonical_op = if h1 <= h2 { c.op() } else { c.op().flip() };
    let mut seed = 0u64;
    hash_combine(&mut seed, h1.min(h2));
    hash_combine(&mut seed, h1.max(h2));
    hash_combine(&mut seed, canonical_op as u64);
    seed
}

/// Sorts the condition hashes, then folds them with `hash_combine`, exactly
/// as the reference `std::hash<PatternTemplate>` does. Takes a slice of
/// already-hashed conditions so [`super::template::PatternTemplate`] and the
/// universe generator's dedup set agree bit-for-bit without either one
/// constructing the other.
pub fn hash_condition_set(condition_hashes: &[u64]) -> u64 {
    if condition_hashes.is_empty() {
        return 0;
    }
    let mut sorted = condition_hashes.to_vec();
    sorted.sort_unstable();
    let mut seed = 0u64;
    for h in sorted {
        hash_combine(&mut seed, h);
    }
    seed
}

pub fn hash_conditions(conditions: &[PatternCondition]) -> u64 {
    let hashes: Vec<u64> = conditions.iter().map(hash_pattern_condition).collect();
    hash_condition_set(&hashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::component::ComponentType;
    use crate::pattern::condition::ComparisonOperator;

    #[test]
    fn condition_hash_is_direction_independent() {
        let open0 = PriceComponentDescriptor::new(ComponentType::Open, 0);
        let close0 = PriceComponentDescriptor::new(ComponentType::Close, 0);
        let a = PatternCondition::new(open0, ComparisonOperator::GreaterThan, close0);
        let b = PatternCondition::new(close0, ComparisonOperator::LessThan, open0);
        assert_eq!(hash_pattern_condition(&a), hash_pattern_condition(&b));
    }

    #[test]
    fn template_hash_is_order_independent() {
        let c0 = PatternCondition::new(
            PriceComponentDescriptor::new(ComponentType::Open, 1),
            ComparisonOperator::GreaterThan,
            PriceComponentDescriptor::new(ComponentType::Close, 0),
        );
        let c1 = PatternCondition::new(
            PriceComponentDescriptor::new(ComponentType::Close, 1),
            ComparisonOperator::GreaterThan,
            PriceComponentDescriptor::new(ComponentType::Open, 0),
        );
        let forward = hash_conditions(&[c0, c1]);
        let reversed = hash_conditions(&[c1, c0]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn single_descriptor_change_changes_the_hash() {
        let c0 = PatternCondition::new(
            PriceComponentDescriptor::new(ComponentType::Open, 1),
            ComparisonOperator::GreaterThan,
            PriceComponentDescriptor::new(ComponentType::Close, 0),
        );
        let c0_shifted = PatternCondition::new(
            PriceComponentDescriptor::new(ComponentType::Open, 2),
            ComparisonOperator::GreaterThan,
            PriceComponentDescriptor::new(ComponentType::Close, 0),
        );
        assert_ne!(hash_conditions(&[c0]), hash_conditions(&[c0_shifted]));
    }

    #[test]
    fn empty_condition_set_hashes_to_zero() {
        assert_eq!(hash_condition_set(&[]), 0);
    }
}
