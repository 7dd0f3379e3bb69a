//! §4.C — Pattern Universe Generator.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Mutex;

use tracing::{debug, info_span};

use crate::executor::{AnyExecutor, Executor};
use crate::pattern::component::{ComponentType, PriceComponentDescriptor};
use crate::pattern::condition::{ComparisonOperator, PatternCondition};
use crate::pattern::template::PatternTemplate;

/// A named configuration constraining lookback, component palette and
/// condition-count range (§4.C). `MIXED`-style modes additionally filter
/// out same-component-type conditions, reproducing the empirically
/// observed PAL restriction.
#[derive(Debug, Clone)]
pub struct SearchMode {
    pub name: &'static str,
    pub max_lookback: u8,
    pub condition_count_range: RangeInclusive<u8>,
    pub components: Vec<ComponentType>,
    pub mixed_style: bool,
}

impl SearchMode {
    pub fn basic() -> Self {
        SearchMode {
            name: "BASIC",
            max_lookback: 4,
            condition_count_range: 2..=6,
            components: vec![
                ComponentType::Open,
                ComponentType::High,
                ComponentType::Low,
                ComponentType::Close,
            ],
            mixed_style: false,
        }
    }

    pub fn extended() -> Self {
        SearchMode {
            name: "EXTENDED",
            max_lookback: 6,
            condition_count_range: 2..=6,
            components: vec![
                ComponentType::Open,
                ComponentType::High,
                ComponentType::Low,
                ComponentType::Close,
                ComponentType::Volume,
            ],
            mixed_style: false,
        }
    }

    pub fn deep() -> Self {
        SearchMode {
            name: "DEEP",
            max_lookback: 8,
            condition_count_range: 2..=9,
            components: ComponentType::ALL.to_vec(),
            mixed_style: false,
        }
    }

    pub fn close() -> Self {
        SearchMode {
            name: "CLOSE",
            max_lookback: 8,
            condition_count_range: 3..=9,
            components: vec![ComponentType::Close],
            mixed_style: false,
        }
    }

    pub fn high_low() -> Self {
        SearchMode {
            name: "HIGH_LOW",
            max_lookback: 8,
            condition_count_range: 3..=9,
            components: vec![ComponentType::High, ComponentType::Low],
            mixed_style: false,
        }
    }

    pub fn open_close() -> Self {
        SearchMode {
            name: "OPEN_CLOSE",
            max_lookback: 8,
            condition_count_range: 3..=9,
            components: vec![ComponentType::Open, ComponentType::Close],
            mixed_style: false,
        }
    }

    pub fn mixed() -> Self {
        SearchMode {
            name: "MIXED",
            max_lookback: 8,
            condition_count_range: 2..=9,
            components: ComponentType::ALL.to_vec(),
            mixed_style: true,
        }
    }
}

/// Stage 1 (§4.C): cartesian product of the mode's component types with
/// offsets `0..=max_lookback`.
pub fn generate_component_pool(mode: &SearchMode) -> Vec<PriceComponentDescriptor> {
    let mut pool = Vec::new();
    for &component_type in &mode.components {
        for offset in 0..=mode.max_lookback {
            pool.push(PriceComponentDescriptor::new(component_type, offset));
        }
    }
    pool
}

/// Stage 2 (§4.C): for every unordered component pair, emit both
/// directions; in `MIXED`-style modes, drop same-component-type pairs.
pub fn generate_condition_pool(
    component_pool: &[PriceComponentDescriptor],
    mixed_style: bool,
) -> Vec<PatternCondition> {
    let mut pool = Vec::new();
    for (i, &a) in component_pool.iter().enumerate() {
        for &b in &component_pool[i + 1..] {
            if mixed_style && a.component_type() == b.component_type() {
                continue;
            }
            pool.push(PatternCondition::new(a, ComparisonOperator::GreaterThan, b));
            pool.push(PatternCondition::new(b, ComparisonOperator::GreaterThan, a));
        }
    }
    pool
}

/// Rejects combinations that reuse the same descriptor pair in two distinct
/// conditions, or that are trivially degenerate.
fn is_valid_combination(combination: &[PatternCondition]) -> bool {
    let mut seen_pairs: HashSet<(PriceComponentDescriptor, PriceComponentDescriptor)> = HashSet::new();
    for condition in combination {
        if condition.is_degenerate() {
            return false;
        }
        let a = condition.lhs();
        let b = condition.rhs();
        let key = if a <= b { (a, b) } else { (b, a) };
        if !seen_pairs.insert(key) {
            return false;
        }
    }
    true
}

fn generate_pattern_name(combination: &[PatternCondition], prefix: &str) -> String {
    let mut parts = Vec::with_capacity(combination.len());
    for condition in combination {
        parts.push(format!(
            "{:?}[{}]>{:?}[{}]",
            condition.lhs().component_type(),
            condition.lhs().bar_offset(),
            condition.rhs().component_type(),
            condition.rhs().bar_offset()
        ));
    }
    format!("{prefix}{}", parts.join("_AND_"))
}

fn find_combinations_recursive(
    pool: &[PatternCondition],
    start: usize,
    k: u8,
    current: &mut Vec<PatternCondition>,
    out: &mut Vec<PatternTemplate>,
    seen_hashes: &mut HashSet<u64>,
) {
    if current.len() as u8 == k {
        if is_valid_combination(current) {
            let name = generate_pattern_name(current, "");
            let template = PatternTemplate::with_conditions(name, current.clone());
            let hash = template.canonical_hash();
            if seen_hashes.insert(hash) {
                out.push(template);
            }
        }
        return;
    }
    for i in start..pool.len() {
        current.push(pool[i]);
        find_combinations_recursive(pool, i + 1, k, current, out, seen_hashes);
        current.pop();
    }
}

/// Produces a `[Delay: k]` variant by shifting every bar offset in every
/// condition by `delay` (§4.C).
pub fn create_delayed_template(base: &PatternTemplate, delay: u8) -> PatternTemplate {
    let shifted: Vec<PatternCondition> = base.conditions().iter().map(|c| c.delayed(delay)).collect();
    PatternTemplate::with_conditions(format!("{}[Delay: {}]", base.name(), delay), shifted)
}

/// Chains conditions across two exact templates to exercise transitive
/// relations, dropping the result if it collides with an already-seen hash
/// (§4.C's "Split" transform).
pub fn generate_split_templates(
    exact_templates: &[PatternTemplate],
    seen_hashes: &mut HashSet<u64>,
) -> Vec<PatternTemplate> {
    let mut out = Vec::new();
    for (i, a) in exact_templates.iter().enumerate() {
        for b in &exact_templates[i + 1..] {
            let mut conditions = a.conditions().to_vec();
            conditions.extend_from_slice(b.conditions());
            if !is_valid_combination(&conditions) {
                continue;
            }
            let name = format!("Split_{}_{}", a.name(), b.name());
            let template = PatternTemplate::with_conditions(name, conditions);
            if seen_hashes.insert(template.canonical_hash()) {
                out.push(template);
            }
        }
    }
    out
}

/// Enumerates the full exact-template universe for `mode`, fanning the
/// per-length searches out across `executor` and merging under a single
/// dedup set — exactly the shape §4.C's "Parallelization" paragraph
/// describes: thread-local accumulation, mutex-protected merge, a single
/// global seen-hash set surviving the merge.
pub fn generate_universe(mode: &SearchMode, executor: &AnyExecutor) -> Vec<PatternTemplate> {
    let span = info_span!("generate_universe", search_mode = mode.name);
    let _enter = span.enter();

    let component_pool = generate_component_pool(mode);
    let condition_pool = generate_condition_pool(&component_pool, mode.mixed_style);

    let lengths: Vec<u8> = mode.condition_count_range.clone().collect();
    let merged_hashes: Mutex<HashSet<u64>> = Mutex::new(HashSet::new());

    let per_length_results = executor.parallel_for(lengths.len(), |idx| {
        let k = lengths[idx];
        let mut local_seen = HashSet::new();
        let mut local_templates = Vec::new();
        let mut current = Vec::new();
        find_combinations_recursive(
            &condition_pool,
            0,
            k,
            &mut current,
            &mut local_templates,
            &mut local_seen,
        );
        local_templates
    });

    let mut retained = Vec::new();
    let mut candidates_considered = 0usize;
    for batch in per_length_results {
        candidates_considered += batch.len();
        let mut guard = merged_hashes.lock().expect("universe merge mutex poisoned");
        for template in batch {
            if guard.insert(template.canonical_hash()) {
                retained.push(template);
            }
        }
    }
    let duplicates_dropped = candidates_considered.saturating_sub(retained.len());
    debug!(
        candidates_considered,
        duplicates_dropped,
        templates_retained = retained.len(),
        "universe generation complete"
    );

    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::AnyExecutor;

    #[test]
    fn component_pool_is_the_cartesian_product() {
        let mode = SearchMode {
            name: "test",
            max_lookback: 1,
            condition_count_range: 2..=2,
            components: vec![ComponentType::Open, ComponentType::Close],
            mixed_style: false,
        };
        let pool = generate_component_pool(&mode);
        assert_eq!(pool.len(), 4); // 2 components * 2 offsets (0,1)
    }

    #[test]
    fn mixed_style_drops_same_component_pairs() {
        let pool = vec![
            PriceComponentDescriptor::new(ComponentType::Close, 0),
            PriceComponentDescriptor::new(ComponentType::Close, 1),
            PriceComponentDescriptor::new(ComponentType::Open, 0),
        ];
        let conditions = generate_condition_pool(&pool, true);
        for c in &conditions {
            assert_ne!(c.lhs().component_type(), c.rhs().component_type());
        }
    }

    #[test]
    fn generation_dedups_by_canonical_hash() {
        let mode = SearchMode {
            name: "tiny",
            max_lookback: 1,
            condition_count_range: 2..=2,
            components: vec![ComponentType::Open, ComponentType::Close],
            mixed_style: false,
        };
        let executor = AnyExecutor::single();
        let templates = generate_universe(&mode, &executor);

        let mut hashes = HashSet::new();
        for t in &templates {
            assert!(hashes.insert(t.canonical_hash()), "duplicate canonical hash emitted");
        }
    }

    #[test]
    fn delay_suffixes_the_name_and_shifts_offsets() {
        let base = PatternTemplate::with_conditions(
            "base",
            vec![PatternCondition::new(
                PriceComponentDescriptor::new(ComponentType::Close, 0),
                ComparisonOperator::GreaterThan,
                PriceComponentDescriptor::new(ComponentType::Open, 1),
            )],
        );
        let delayed = create_delayed_template(&base, 3);
        assert_eq!(delayed.name(), "base[Delay: 3]");
        assert_eq!(delayed.conditions()[0].lhs().bar_offset(), 3);
        assert_eq!(delayed.conditions()[0].rhs().bar_offset(), 4);
    }
}
