#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Generator configuration types.
pub mod config;
/// Oracle generation over canonical configuration artifacts.
pub mod config_oracle;
/// Centralized constants used across selection, generation, and bundles.
pub mod constants;
/// Built-in corpus texts driven through every tokenizer subject.
pub mod corpus;
/// End-to-end pipeline over the three oracle passes.
pub mod pipeline;
/// Provider traits and built-in providers.
pub mod provider;
/// Subject registry, selection policy, and the flattened subject set.
pub mod registry;
/// Deterministic spectral case generation.
pub mod spectral;
/// Oracle generation over tokenizer round trips.
pub mod tokenizer_oracle;
/// Shared type aliases.
pub mod types;
/// Bundle serialization.
pub mod writer;

mod errors;

pub use config::GeneratorConfig;
pub use config_oracle::{ConfigOracleGenerator, ConfigOracleRecord, ConfigOracleSet, ConfigRunReport};
pub use corpus::TestCorpus;
pub use errors::OracleError;
pub use pipeline::{OraclePipeline, RunSummary};
pub use provider::fourier::RustFftTransform;
pub use provider::{
    Acquisition, ByteTokenizer, ConfigHandle, ConfigProvider, DropoutControl, FourierTransform,
    InMemoryConfigProvider, InMemoryTokenizerProvider, TextFailure, TokenFields, TokenizerHandle,
    TokenizerProvider,
};
#[cfg(feature = "huggingface")]
pub use provider::{HubConfigProvider, HubTokenizerProvider};
pub use registry::{ExclusionPolicy, SubjectRegistry, SubjectSet, SupplementalSubjects};
pub use spectral::{SizeSchedule, SpectralOracleGenerator, SpectralOracleRecord};
pub use tokenizer_oracle::{
    TokenizerOracleGenerator, TokenizerOracleRecord, TokenizerOracleSet, TokenizerRunReport,
};
pub use types::{CaseKey, CategoryId, CorpusText, SubjectId, TaskId};
pub use writer::OracleWriter;
