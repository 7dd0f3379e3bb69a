//! §3.9, §6.3, §6.7, §4.G — Analysis Database.
//!
//! Persistent JSON store tracking which bar combinations and component
//! sets were observed for each pattern index across the files analyzed so
//! far. Grounded on the teacher's manifest persistence idiom
//! (atomic write via temp file + rename) and on the reference source's
//! incremental-analysis workflow: re-opening a partial database and
//! merging in new files must not lose prior observations.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pattern::component::{ComponentType, PriceComponentDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BarCombinationInfo {
    pub components: Vec<PriceComponentDescriptor>,
    pub max_bar_offset: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysisInfo {
    pub file_path: String,
    pub patterns_contributed: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchTypeStats {
    pub templates_generated: u64,
    pub templates_retained: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDatabase {
    patterns: BTreeMap<u32, BarCombinationInfo>,
    index_mappings: BTreeMap<String, u32>,
    analyzed_files: Vec<FileAnalysisInfo>,
    search_type_stats: BTreeMap<String, SearchTypeStats>,
}

impl AnalysisDatabase {
    pub fn new() -> Self {
        AnalysisDatabase::default()
    }

    /// Loads a database from `path`, treating a missing file as an empty
    /// database (§6.7's "re-openable from partial data").
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        if !path.exists() {
            return Ok(AnalysisDatabase::new());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading analysis database {}", path.display()))?;
        let db: AnalysisDatabase = serde_json::from_str(&text)
            .with_context(|| format!("parsing analysis database {}", path.display()))?;
        Ok(db)
    }

    /// Atomic write: serialize to a temp file in the same directory, then
    /// rename over the destination, the way the teacher's manifest writer
    /// persists run state.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;
        let json = serde_json::to_string_pretty(self).context("serializing analysis database")?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("writing temp analysis database {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming temp analysis database into {}", path.display()))?;
        Ok(())
    }

    /// Records the component set observed for `pattern_index` from one
    /// file's analysis. If a prior file already recorded a *different*
    /// component set for the same index, this logs a consistency warning
    /// (§7) rather than throwing or overwriting — the audit-preserving
    /// behavior called for in §9's design notes: disagreements are kept
    /// visible, not silently resolved.
    pub fn record_pattern_analysis(&mut self, pattern_index: u32, info: BarCombinationInfo) {
        if let Some(existing) = self.patterns.get(&pattern_index) {
            if existing != &info {
                warn!(
                    pattern_index,
                    "component set disagreement for existing pattern index; keeping newest observation for audit"
                );
            }
        }
        self.patterns.insert(pattern_index, info);
    }

    pub fn record_file_analysis(&mut self, file_path: impl Into<String>, patterns_contributed: Vec<u32>) {
        self.analyzed_files.push(FileAnalysisInfo {
            file_path: file_path.into(),
            patterns_contributed,
        });
    }

    pub fn record_index_mapping(&mut self, index_key: impl Into<String>, pattern_index: u32) {
        self.index_mappings.insert(index_key.into(), pattern_index);
    }

    pub fn record_search_type_stats(&mut self, search_type: impl Into<String>, stats: SearchTypeStats) {
        self.search_type_stats.insert(search_type.into(), stats);
    }

    pub fn pattern_info(&self, pattern_index: u32) -> Option<&BarCombinationInfo> {
        self.patterns.get(&pattern_index)
    }

    pub fn analyzed_file_count(&self) -> usize {
        self.analyzed_files.len()
    }

    /// Combines an incremental per-file run into this database; used to
    /// support the "export -> import yields byte-equivalent state"
    /// round-trip property (§8) when two partial runs are merged and then
    /// compared against a single combined run.
    pub fn merge(&mut self, other: AnalysisDatabase) {
        for (index, info) in other.patterns {
            self.record_pattern_analysis(index, info);
        }
        self.index_mappings.extend(other.index_mappings);
        self.analyzed_files.extend(other.analyzed_files);
        for (search_type, stats) in other.search_type_stats {
            self.search_type_stats
                .entry(search_type)
                .and_modify(|existing| {
                    existing.templates_generated += stats.templates_generated;
                    existing.templates_retained += stats.templates_retained;
                })
                .or_insert(stats);
        }
    }

    /// Set of component types referenced anywhere in the database; useful
    /// for a quick sanity check before running a new search mode.
    pub fn all_component_types(&self) -> HashSet<ComponentType> {
        self.patterns
            .values()
            .flat_map(|info| info.components.iter().map(|d| d.component_type()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loading_a_missing_path_yields_an_empty_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.json");
        let db = AnalysisDatabase::load(&path).unwrap();
        assert_eq!(db.analyzed_file_count(), 0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut db = AnalysisDatabase::new();
        db.record_pattern_analysis(
            1,
            BarCombinationInfo {
                components: vec![PriceComponentDescriptor::new(ComponentType::Close, 0)],
                max_bar_offset: 0,
            },
        );
        db.record_file_analysis("a.txt", vec![1]);
        db.save(&path).unwrap();

        let loaded = AnalysisDatabase::load(&path).unwrap();
        assert_eq!(loaded.pattern_info(1), db.pattern_info(1));
        assert_eq!(loaded.analyzed_file_count(), 1);
    }

    #[test]
    fn conflicting_component_set_is_kept_not_rejected() {
        let mut db = AnalysisDatabase::new();
        db.record_pattern_analysis(
            5,
            BarCombinationInfo {
                components: vec![PriceComponentDescriptor::new(ComponentType::Close, 0)],
                max_bar_offset: 0,
            },
        );
        // A later file disagrees about the component set for the same index.
        db.record_pattern_analysis(
            5,
            BarCombinationInfo {
                components: vec![PriceComponentDescriptor::new(ComponentType::Open, 1)],
                max_bar_offset: 1,
            },
        );
        assert_eq!(
            db.pattern_info(5).unwrap().components[0].component_type(),
            ComponentType::Open
        );
    }
}
