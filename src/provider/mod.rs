//! Provider interfaces for the three capture paths.
//!
//! Ownership model:
//! - `TokenizerProvider` and `ConfigProvider` resolve a subject identifier to
//!   a loaded artifact handle, reporting absence and failure separately.
//! - Handles own one loaded artifact and answer capture calls against it.
//! - `FourierTransform` owns the spectral backend driven once per case.

use indexmap::IndexMap;
use num_complex::Complex64;
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::OracleError;
use crate::types::SubjectId;

/// Spectral transform implementations.
pub mod fourier;
/// Hub-backed provider implementations.
#[cfg(feature = "huggingface")]
pub mod huggingface;
#[cfg(feature = "huggingface")]
pub use huggingface::{HubConfigProvider, HubTokenizerProvider};

/// Outcome of resolving a subject identifier to a loaded artifact.
///
/// Absence and failure are distinct on purpose: a subject without the
/// artifact is skipped silently, while a load failure is logged before the
/// subject is skipped. Neither stops the run.
#[derive(Debug)]
pub enum Acquisition<H> {
    /// Artifact found and loaded; capture can proceed.
    Ready(H),
    /// The subject does not publish this artifact.
    NotApplicable,
    /// The artifact exists but could not be loaded or parsed.
    Failed(String),
}

/// Named integer field sequences produced by one encode call, in capture order.
pub type TokenFields = IndexMap<String, Vec<u32>>;

/// A per-text capture failure.
///
/// Skips the affected text only; remaining texts for the subject still run.
#[derive(Clone, Debug)]
pub struct TextFailure {
    /// Human-readable reason recorded in logs.
    pub reason: String,
}

impl TextFailure {
    /// Build a failure from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TextFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.reason)
    }
}

/// Resolves subject identifiers to tokenizer handles.
pub trait TokenizerProvider: Send + Sync {
    /// Try to load the tokenizer artifact for `subject`.
    fn acquire(&self, subject: &str) -> Acquisition<Box<dyn TokenizerHandle>>;
}

/// One loaded tokenizer answering encode/decode calls.
pub trait TokenizerHandle {
    /// Encode `text` into named integer field sequences.
    ///
    /// Field names and count vary by tokenizer. A text is captured only when
    /// an `input_ids` field is present in the result.
    fn encode(&self, text: &str) -> Result<TokenFields, TextFailure>;

    /// Decode `ids` back into text, keeping or stripping special markers.
    fn decode(&self, ids: &[u32], keep_special: bool) -> Result<String, TextFailure>;

    /// Dropout control when the loaded model carries a stochastic stage.
    ///
    /// Handles without such a stage return `None` and are used as-is.
    fn dropout_control(&mut self) -> Option<&mut dyn DropoutControl> {
        None
    }
}

/// Capability surface for tokenizers with a stochastic segmentation stage.
pub trait DropoutControl {
    /// Force deterministic segmentation for capture.
    fn disable_dropout(&mut self);
}

/// Resolves subject identifiers to configuration handles.
pub trait ConfigProvider: Send + Sync {
    /// Try to load the configuration artifact for `subject`.
    fn acquire(&self, subject: &str) -> Acquisition<Box<dyn ConfigHandle>>;
}

/// One loaded configuration answering canonical-form queries.
pub trait ConfigHandle {
    /// Canonical key/value form of the loaded configuration.
    ///
    /// Defaults are resolved and keys are in the artifact's canonical order;
    /// non-portable fields are still present and removed by the caller.
    fn canonical_fields(&self) -> Map<String, Value>;
}

/// Spectral transform backend.
pub trait FourierTransform: Send {
    /// Forward transform of `input`.
    ///
    /// The output must have the same length as the input; the spectral
    /// generator verifies this and treats a mismatch as fatal.
    fn forward(&mut self, input: &[Complex64]) -> Result<Vec<Complex64>, OracleError>;
}

/// Byte-level reference tokenizer for offline runs and tests.
///
/// Every byte maps to `byte + 2`; ids 0 and 1 are the `<s>` / `</s>` markers
/// wrapped around each encoding. Decoding without special markers restores
/// the input text exactly.
#[derive(Clone, Debug, Default)]
pub struct ByteTokenizer;

impl ByteTokenizer {
    const BOS_ID: u32 = 0;
    const EOS_ID: u32 = 1;
    const BYTE_OFFSET: u32 = 2;

    fn flush(pending: &mut Vec<u8>, out: &mut String) {
        if !pending.is_empty() {
            out.push_str(&String::from_utf8_lossy(pending));
            pending.clear();
        }
    }
}

impl TokenizerHandle for ByteTokenizer {
    fn encode(&self, text: &str) -> Result<TokenFields, TextFailure> {
        let mut ids = Vec::with_capacity(text.len() + 2);
        ids.push(Self::BOS_ID);
        ids.extend(text.bytes().map(|byte| u32::from(byte) + Self::BYTE_OFFSET));
        ids.push(Self::EOS_ID);

        let mut fields = TokenFields::new();
        fields.insert(
            crate::constants::tokenizer::INPUT_IDS_FIELD.to_string(),
            ids.clone(),
        );
        fields.insert(
            crate::constants::tokenizer::ATTENTION_MASK_FIELD.to_string(),
            vec![1; ids.len()],
        );
        Ok(fields)
    }

    fn decode(&self, ids: &[u32], keep_special: bool) -> Result<String, TextFailure> {
        let mut out = String::new();
        let mut pending = Vec::new();
        for &id in ids {
            match id {
                Self::BOS_ID => {
                    Self::flush(&mut pending, &mut out);
                    if keep_special {
                        out.push_str("<s>");
                    }
                }
                Self::EOS_ID => {
                    Self::flush(&mut pending, &mut out);
                    if keep_special {
                        out.push_str("</s>");
                    }
                }
                byte_id if byte_id < Self::BYTE_OFFSET + 256 => {
                    pending.push((byte_id - Self::BYTE_OFFSET) as u8);
                }
                unknown => {
                    return Err(TextFailure::new(format!("id {unknown} out of vocabulary")));
                }
            }
        }
        Self::flush(&mut pending, &mut out);
        Ok(out)
    }
}

/// In-memory tokenizer provider for tests and offline runs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTokenizerProvider {
    subjects: IndexMap<SubjectId, ByteTokenizer>,
}

impl InMemoryTokenizerProvider {
    /// Register `tokenizer` under `subject`.
    pub fn register(&mut self, subject: &str, tokenizer: ByteTokenizer) {
        self.subjects.insert(subject.to_string(), tokenizer);
    }
}

impl TokenizerProvider for InMemoryTokenizerProvider {
    fn acquire(&self, subject: &str) -> Acquisition<Box<dyn TokenizerHandle>> {
        match self.subjects.get(subject) {
            Some(tokenizer) => Acquisition::Ready(Box::new(tokenizer.clone())),
            None => Acquisition::NotApplicable,
        }
    }
}

/// In-memory config provider for tests and offline runs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryConfigProvider {
    subjects: IndexMap<SubjectId, Map<String, Value>>,
}

impl InMemoryConfigProvider {
    /// Register a canonical field map under `subject`.
    pub fn register(&mut self, subject: &str, fields: Map<String, Value>) {
        self.subjects.insert(subject.to_string(), fields);
    }
}

struct StaticConfigHandle {
    fields: Map<String, Value>,
}

impl ConfigHandle for StaticConfigHandle {
    fn canonical_fields(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    fn acquire(&self, subject: &str) -> Acquisition<Box<dyn ConfigHandle>> {
        match self.subjects.get(subject) {
            Some(fields) => Acquisition::Ready(Box::new(StaticConfigHandle {
                fields: fields.clone(),
            })),
            None => Acquisition::NotApplicable,
        }
    }
}
