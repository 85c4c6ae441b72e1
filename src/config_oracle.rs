//! Configuration oracle generation.
//!
//! For each selected subject the canonical configuration field set is
//! captured as-is, minus fields that carry no meaning outside the source
//! runtime. Any acquisition failure skips the subject and the pass moves
//! on; an empty pass is legal and yields an empty bundle.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::config::NON_PORTABLE_FIELDS;
use crate::provider::{Acquisition, ConfigProvider};
use crate::registry::SubjectSet;
use crate::types::SubjectId;

/// Canonical configuration fields for one subject, keyed alphabetically.
pub type ConfigOracleRecord = Map<String, Value>;

/// Subject identifier → canonical configuration fields.
pub type ConfigOracleSet = IndexMap<SubjectId, ConfigOracleRecord>;

/// Counters from one configuration generation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigRunReport {
    /// Identifiers considered across all categories.
    pub subjects_attempted: usize,
    /// Identifiers that produced a record.
    pub subjects_written: usize,
    /// Identifiers with no configuration artifact.
    pub subjects_not_applicable: usize,
    /// Identifiers whose artifact failed to load or parse.
    pub subjects_load_failed: usize,
}

/// Drives every selected subject through the configuration provider.
pub struct ConfigOracleGenerator<'a> {
    provider: &'a dyn ConfigProvider,
}

impl<'a> ConfigOracleGenerator<'a> {
    /// Create a generator over `provider`.
    pub fn new(provider: &'a dyn ConfigProvider) -> Self {
        Self { provider }
    }

    /// Generate one record per reachable subject, in selection order.
    pub fn generate(&self, subjects: &SubjectSet) -> (ConfigOracleSet, ConfigRunReport) {
        let mut records = ConfigOracleSet::new();
        let mut report = ConfigRunReport::default();
        for (category, subject_ids) in subjects.iter() {
            eprintln!(
                "[goldens:config] generating tests for {category} ({} subject(s))",
                subject_ids.len()
            );
            for subject in subject_ids {
                eprintln!("  - {subject}");
                report.subjects_attempted += 1;

                let handle = match self.provider.acquire(subject) {
                    Acquisition::Ready(handle) => handle,
                    Acquisition::NotApplicable => {
                        report.subjects_not_applicable += 1;
                        debug!(subject, "subject has no configuration; skipped");
                        continue;
                    }
                    Acquisition::Failed(reason) => {
                        report.subjects_load_failed += 1;
                        warn!(subject, reason, "configuration load failed; subject skipped");
                        continue;
                    }
                };

                let mut fields = handle.canonical_fields();
                for field in NON_PORTABLE_FIELDS {
                    fields.remove(*field);
                }
                report.subjects_written += 1;
                records.insert(subject.clone(), fields);
            }
        }
        (records, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::provider::{ConfigHandle, InMemoryConfigProvider};
    use crate::registry::{ExclusionPolicy, SubjectRegistry, SupplementalSubjects};

    fn subject_set(category: &str, subjects: &[&str]) -> SubjectSet {
        let mut registry = SubjectRegistry::default();
        registry.insert_task(category, "default", subjects.iter().copied());
        SubjectSet::build(
            &registry,
            &SupplementalSubjects::none(),
            &ExclusionPolicy::allow_all(),
        )
    }

    fn fields(entries: &[(&str, Value)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn non_portable_fields_are_stripped_from_records() {
        let mut provider = InMemoryConfigProvider::default();
        provider.register(
            "family/model",
            fields(&[
                ("hidden_size", json!(768)),
                ("model_type", json!("family")),
                ("torch_dtype", json!("float32")),
            ]),
        );

        let generator = ConfigOracleGenerator::new(&provider);
        let (records, report) = generator.generate(&subject_set("family", &["family/model"]));

        let record = &records["family/model"];
        assert!(!record.contains_key("torch_dtype"));
        assert_eq!(record["hidden_size"], json!(768));
        assert_eq!(record["model_type"], json!("family"));
        assert_eq!(report.subjects_written, 1);
    }

    #[test]
    fn records_without_non_portable_fields_pass_through_unchanged() {
        let mut provider = InMemoryConfigProvider::default();
        let expected = fields(&[("model_type", json!("family")), ("vocab_size", json!(100))]);
        provider.register("family/model", expected.clone());

        let generator = ConfigOracleGenerator::new(&provider);
        let (records, _) = generator.generate(&subject_set("family", &["family/model"]));

        assert_eq!(records["family/model"], expected);
    }

    #[test]
    fn unavailable_subjects_are_counted_and_do_not_abort_the_pass() {
        struct MixedProvider;

        impl ConfigProvider for MixedProvider {
            fn acquire(&self, subject: &str) -> Acquisition<Box<dyn ConfigHandle>> {
                struct Static(Map<String, Value>);
                impl ConfigHandle for Static {
                    fn canonical_fields(&self) -> Map<String, Value> {
                        self.0.clone()
                    }
                }
                match subject {
                    "family/none" => Acquisition::NotApplicable,
                    "family/broken" => Acquisition::Failed("artifact corrupt".to_string()),
                    _ => Acquisition::Ready(Box::new(Static(Map::new()))),
                }
            }
        }

        let generator = ConfigOracleGenerator::new(&MixedProvider);
        let (records, report) = generator.generate(&subject_set(
            "family",
            &["family/none", "family/broken", "family/ok"],
        ));

        assert_eq!(records.keys().collect::<Vec<_>>(), ["family/ok"]);
        assert_eq!(report.subjects_attempted, 3);
        assert_eq!(report.subjects_not_applicable, 1);
        assert_eq!(report.subjects_load_failed, 1);
        assert_eq!(report.subjects_written, 1);
    }

    #[test]
    fn subjects_follow_selection_order_across_categories() {
        let mut provider = InMemoryConfigProvider::default();
        provider.register("beta/model", Map::new());
        provider.register("alpha/model", Map::new());

        let mut registry = SubjectRegistry::default();
        registry.insert_task("beta", "default", ["beta/model"]);
        registry.insert_task("alpha", "default", ["alpha/model"]);
        let subjects = SubjectSet::build(
            &registry,
            &SupplementalSubjects::none(),
            &ExclusionPolicy::allow_all(),
        );

        let generator = ConfigOracleGenerator::new(&provider);
        let (records, _) = generator.generate(&subjects);

        assert_eq!(
            records.keys().collect::<Vec<_>>(),
            ["beta/model", "alpha/model"]
        );
    }
}
