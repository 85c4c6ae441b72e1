use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::registry::{
    CATEGORY_CAPS, EXCLUDED_CATEGORIES, EXCLUDED_SUBJECTS, SUPPLEMENTAL_TOKENIZER_SUBJECTS,
};
use crate::errors::OracleError;
use crate::types::{CategoryId, SubjectId, TaskId};

/// Read-only nested registry of subjects: category -> task -> identifiers.
///
/// Categories, tasks, and identifier sequences keep their source order; the
/// task level exists only for upstream bookkeeping and is dropped when the
/// registry is flattened into a [`SubjectSet`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectRegistry {
    categories: IndexMap<CategoryId, IndexMap<TaskId, Vec<SubjectId>>>,
}

impl SubjectRegistry {
    /// Load a registry from a JSON document of nested category/task mappings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| OracleError::RegistryLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| OracleError::RegistryLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Append identifiers under `category`/`task`, creating both as needed.
    pub fn insert_task<I, S>(&mut self, category: &str, task: &str, subjects: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<SubjectId>,
    {
        self.categories
            .entry(category.to_string())
            .or_default()
            .entry(task.to_string())
            .or_default()
            .extend(subjects.into_iter().map(Into::into));
    }

    /// Number of categories in the registry.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` when the registry has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Flatten into category -> ordered identifiers, dropping the task level.
    ///
    /// Per-category order is task order then identifier order within the task.
    /// Identifiers are not deduplicated across categories.
    pub fn flatten(&self) -> IndexMap<CategoryId, Vec<SubjectId>> {
        self.categories
            .iter()
            .map(|(category, tasks)| {
                let subjects = tasks.values().flatten().cloned().collect();
                (category.clone(), subjects)
            })
            .collect()
    }
}

/// Curated identifiers merged into selection for categories whose tokenizer
/// is testable even though the full model is not.
#[derive(Clone, Debug, Default)]
pub struct SupplementalSubjects {
    entries: IndexMap<CategoryId, Vec<SubjectId>>,
}

impl SupplementalSubjects {
    /// An empty supplement (used by the config path).
    pub fn none() -> Self {
        Self::default()
    }

    /// The curated tokenizer-only supplement shipped with this crate.
    pub fn curated() -> Self {
        let entries = SUPPLEMENTAL_TOKENIZER_SUBJECTS
            .iter()
            .map(|(category, subjects)| {
                (
                    category.to_string(),
                    subjects.iter().map(|subject| subject.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Register supplemental identifiers for `category`.
    pub fn insert<I, S>(&mut self, category: &str, subjects: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<SubjectId>,
    {
        self.entries
            .entry(category.to_string())
            .or_default()
            .extend(subjects.into_iter().map(Into::into));
    }

    fn iter(&self) -> impl Iterator<Item = (&CategoryId, &[SubjectId])> {
        self.entries
            .iter()
            .map(|(category, subjects)| (category, subjects.as_slice()))
    }
}

/// Selection policy evaluated before any generation work for a subject.
///
/// The three sets are independent: whole categories, individual identifiers,
/// and per-category caps applied by front-truncation (earliest identifiers
/// are kept, never sampled).
#[derive(Clone, Debug, Default)]
pub struct ExclusionPolicy {
    /// Categories dropped entirely.
    pub excluded_categories: Vec<CategoryId>,
    /// Identifiers dropped wherever they appear.
    pub excluded_subjects: Vec<SubjectId>,
    /// Maximum identifiers processed per capped category.
    pub category_caps: IndexMap<CategoryId, usize>,
}

impl ExclusionPolicy {
    /// The curated default policy shipped with this crate.
    pub fn curated() -> Self {
        Self {
            excluded_categories: EXCLUDED_CATEGORIES
                .iter()
                .map(|category| category.to_string())
                .collect(),
            excluded_subjects: EXCLUDED_SUBJECTS
                .iter()
                .map(|subject| subject.to_string())
                .collect(),
            category_caps: CATEGORY_CAPS
                .iter()
                .map(|(category, cap)| (category.to_string(), *cap))
                .collect(),
        }
    }

    /// A policy excluding nothing.
    pub fn allow_all() -> Self {
        Self::default()
    }

    fn is_category_excluded(&self, category: &str) -> bool {
        self.excluded_categories.iter().any(|entry| entry == category)
    }

    fn is_subject_excluded(&self, subject: &str) -> bool {
        self.excluded_subjects.iter().any(|entry| entry == subject)
    }

    fn cap_for(&self, category: &str) -> Option<usize> {
        self.category_caps.get(category).copied()
    }
}

/// Final per-category identifier sequences to process, in order.
///
/// Built once, before any generation begins, from the raw registry plus the
/// supplemental set and the exclusion policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubjectSet {
    categories: IndexMap<CategoryId, Vec<SubjectId>>,
}

impl SubjectSet {
    /// Build the final selection from `registry`, `supplement`, and `policy`.
    ///
    /// Stage one flattens the registry and appends supplemental identifiers
    /// per category (deduplicated within a category, registry entries first).
    /// Stage two applies the policy: excluded categories are dropped, capped
    /// categories are front-truncated, then excluded identifiers are removed.
    pub fn build(
        registry: &SubjectRegistry,
        supplement: &SupplementalSubjects,
        policy: &ExclusionPolicy,
    ) -> Self {
        let mut merged = registry.flatten();
        for (category, subjects) in supplement.iter() {
            let entry = merged.entry(category.clone()).or_default();
            for subject in subjects {
                if !entry.contains(subject) {
                    entry.push(subject.clone());
                }
            }
        }

        let mut categories = IndexMap::new();
        for (category, mut subjects) in merged {
            if policy.is_category_excluded(&category) {
                continue;
            }
            if let Some(cap) = policy.cap_for(&category) {
                subjects.truncate(cap);
            }
            subjects.retain(|subject| !policy.is_subject_excluded(subject));
            categories.insert(category, subjects);
        }
        Self { categories }
    }

    /// Iterate categories with their selected identifier sequences.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &[SubjectId])> {
        self.categories
            .iter()
            .map(|(category, subjects)| (category, subjects.as_slice()))
    }

    /// Number of categories in the selection.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` when no categories survived selection.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total identifiers across all categories.
    pub fn subject_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Selected identifiers for `category`, if present.
    pub fn subjects(&self, category: &str) -> Option<&[SubjectId]> {
        self.categories.get(category).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> SubjectRegistry {
        let mut registry = SubjectRegistry::default();
        registry.insert_task("bert", "feature-extraction", ["bert-base-uncased"]);
        registry.insert_task("bert", "fill-mask", ["bert-base-cased", "bert-base-uncased2"]);
        registry.insert_task("marian", "translation", (0..12).map(|idx| format!("marian/model-{idx}")));
        registry.insert_task("xlm", "fill-mask", ["xlm-mlm-en-2048"]);
        registry
    }

    #[test]
    fn flatten_drops_tasks_and_keeps_order() {
        let flat = sample_registry().flatten();
        assert_eq!(
            flat.get("bert").map(Vec::as_slice),
            Some(
                &[
                    "bert-base-uncased".to_string(),
                    "bert-base-cased".to_string(),
                    "bert-base-uncased2".to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn build_applies_exclusions_caps_then_subject_filters() {
        let registry = sample_registry();
        let mut policy = ExclusionPolicy::allow_all();
        policy.excluded_categories.push("xlm".to_string());
        policy.excluded_subjects.push("marian/model-3".to_string());
        policy.category_caps.insert("marian".to_string(), 10);

        let set = SubjectSet::build(&registry, &SupplementalSubjects::none(), &policy);
        assert!(set.subjects("xlm").is_none());

        // Cap truncates to the first ten, then the excluded id is removed.
        let marian = set.subjects("marian").unwrap();
        assert_eq!(marian.len(), 9);
        assert_eq!(marian[0], "marian/model-0");
        assert!(!marian.contains(&"marian/model-3".to_string()));
        assert!(!marian.contains(&"marian/model-10".to_string()));
    }

    #[test]
    fn supplement_appends_after_registry_entries_without_duplicates() {
        let mut registry = SubjectRegistry::default();
        registry.insert_task("llama", "text-generation", ["meta/llama-base"]);

        let mut supplement = SupplementalSubjects::none();
        supplement.insert("llama", ["hf-internal-testing/llama-tokenizer", "meta/llama-base"]);
        supplement.insert("mpt", ["mosaicml/mpt-7b"]);

        let set = SubjectSet::build(&registry, &supplement, &ExclusionPolicy::allow_all());
        assert_eq!(
            set.subjects("llama").unwrap(),
            &[
                "meta/llama-base".to_string(),
                "hf-internal-testing/llama-tokenizer".to_string(),
            ][..]
        );
        assert_eq!(
            set.subjects("mpt").unwrap(),
            &["mosaicml/mpt-7b".to_string()][..]
        );
        assert_eq!(set.subject_count(), 3);
    }

    #[test]
    fn curated_policy_matches_shipped_constants() {
        let policy = ExclusionPolicy::curated();
        assert!(policy.is_category_excluded("marian"));
        assert!(policy.is_subject_excluded("facebook/m2m100_418M"));
        assert_eq!(policy.cap_for("marian"), Some(10));
        assert_eq!(policy.cap_for("bert"), None);
    }
}
