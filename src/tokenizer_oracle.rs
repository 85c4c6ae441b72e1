//! Tokenizer oracle generation.
//!
//! Each selected subject is driven through the effective corpus in order.
//! Failures never cross a boundary: a subject that cannot be acquired skips
//! only that subject, and a text that cannot be encoded skips only that
//! text. Subjects that end up with zero records are omitted entirely.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::tokenizer::INPUT_IDS_FIELD;
use crate::corpus::TestCorpus;
use crate::provider::{Acquisition, TextFailure, TokenFields, TokenizerHandle, TokenizerProvider};
use crate::registry::SubjectSet;
use crate::types::SubjectId;

/// One captured encode/decode round trip for a single corpus text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenizerOracleRecord {
    /// The corpus text exactly as submitted.
    pub input: String,
    /// Named integer field sequences returned by the tokenizer.
    pub encoded: TokenFields,
    /// Decode of the id sequence with special markers kept.
    pub decoded_with_special: String,
    /// Decode of the id sequence with special markers stripped.
    pub decoded_without_special: String,
}

/// Subject identifier → ordered record sequence (corpus order).
pub type TokenizerOracleSet = IndexMap<SubjectId, Vec<TokenizerOracleRecord>>;

/// Counters from one tokenizer generation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenizerRunReport {
    /// Identifiers considered across all categories.
    pub subjects_attempted: usize,
    /// Identifiers that produced at least one record.
    pub subjects_written: usize,
    /// Identifiers with no tokenizer artifact.
    pub subjects_not_applicable: usize,
    /// Identifiers whose artifact failed to load.
    pub subjects_load_failed: usize,
    /// Identifiers that loaded but produced zero records.
    pub subjects_empty: usize,
    /// Corpus texts skipped across all subjects.
    pub texts_skipped: usize,
}

/// Drives every selected subject through the corpus and collects records.
pub struct TokenizerOracleGenerator<'a> {
    provider: &'a dyn TokenizerProvider,
    corpus: &'a TestCorpus,
}

impl<'a> TokenizerOracleGenerator<'a> {
    /// Create a generator over `provider` and `corpus`.
    pub fn new(provider: &'a dyn TokenizerProvider, corpus: &'a TestCorpus) -> Self {
        Self { provider, corpus }
    }

    /// Generate records for every subject in `subjects`, in selection order.
    pub fn generate(&self, subjects: &SubjectSet) -> (TokenizerOracleSet, TokenizerRunReport) {
        let mut records = TokenizerOracleSet::new();
        let mut report = TokenizerRunReport::default();
        for (category, subject_ids) in subjects.iter() {
            eprintln!(
                "[goldens:tokenizer] generating tests for {category} ({} subject(s))",
                subject_ids.len()
            );
            for subject in subject_ids {
                eprintln!("  - {subject}");
                report.subjects_attempted += 1;

                let mut handle = match self.provider.acquire(subject) {
                    Acquisition::Ready(handle) => handle,
                    Acquisition::NotApplicable => {
                        report.subjects_not_applicable += 1;
                        debug!(subject, "subject has no tokenizer; skipped");
                        continue;
                    }
                    Acquisition::Failed(reason) => {
                        report.subjects_load_failed += 1;
                        warn!(subject, reason, "tokenizer load failed; subject skipped");
                        continue;
                    }
                };
                if let Some(control) = handle.dropout_control() {
                    control.disable_dropout();
                }

                let mut subject_records = Vec::new();
                for text in self.corpus.effective_texts(subject) {
                    match Self::capture(handle.as_ref(), text) {
                        Ok(record) => subject_records.push(record),
                        Err(failure) => {
                            report.texts_skipped += 1;
                            debug!(subject, reason = %failure.reason, "text skipped");
                        }
                    }
                }

                if subject_records.is_empty() {
                    report.subjects_empty += 1;
                    continue;
                }
                report.subjects_written += 1;
                records.insert(subject.clone(), subject_records);
            }
        }
        (records, report)
    }

    fn capture(
        handle: &dyn TokenizerHandle,
        text: &str,
    ) -> Result<TokenizerOracleRecord, TextFailure> {
        let encoded = handle.encode(text)?;
        let Some(ids) = encoded.get(INPUT_IDS_FIELD) else {
            return Err(TextFailure::new(format!(
                "encode output missing {INPUT_IDS_FIELD}"
            )));
        };
        let decoded_with_special = handle.decode(ids, true)?;
        let decoded_without_special = handle.decode(ids, false)?;
        Ok(TokenizerOracleRecord {
            input: text.to_string(),
            encoded,
            decoded_with_special,
            decoded_without_special,
        })
    }
}
