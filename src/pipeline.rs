//! End-to-end oracle generation.
//!
//! The pipeline owns the registry, the corpus, and the pluggable
//! collaborators, and runs the three passes in a fixed order: tokenizer,
//! configuration, spectral. Each bundle is written as soon as its pass
//! finishes, so earlier artifacts survive a later fatal failure. Write
//! failures are collected per bundle rather than aborting the run; only
//! a missing collaborator or a spectral failure ends it early.
//!
//! Ownership model:
//! - The pipeline takes the registry and configuration by value at
//!   construction and keeps them for its lifetime.
//! - Collaborators are boxed trait objects registered after construction;
//!   the spectral transform is held mutably because planners cache plans.

use std::path::PathBuf;

use tracing::info;

use crate::config::GeneratorConfig;
use crate::config_oracle::{ConfigOracleGenerator, ConfigRunReport};
use crate::constants::bundles::{CONFIG_BUNDLE_FILE, SPECTRAL_BUNDLE_FILE, TOKENIZER_BUNDLE_FILE};
use crate::corpus::TestCorpus;
use crate::errors::OracleError;
use crate::provider::{ConfigProvider, FourierTransform, TokenizerProvider};
use crate::registry::{SubjectRegistry, SubjectSet, SupplementalSubjects};
use crate::spectral::{SizeSchedule, SpectralOracleGenerator};
use crate::tokenizer_oracle::{TokenizerOracleGenerator, TokenizerRunReport};
use crate::writer::OracleWriter;

/// Outcome of one full pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Counters from the tokenizer pass.
    pub tokenizer: TokenizerRunReport,
    /// Counters from the configuration pass.
    pub config: ConfigRunReport,
    /// Number of spectral cases generated.
    pub spectral_cases: usize,
    /// Bundle paths written, in write order.
    pub written: Vec<PathBuf>,
    /// Bundles that failed to write, with the failing bundle's file name.
    pub write_failures: Vec<(String, OracleError)>,
}

impl RunSummary {
    /// True when every bundle reached disk.
    pub fn is_success(&self) -> bool {
        self.write_failures.is_empty()
    }
}

/// Runs the tokenizer, configuration, and spectral passes over one registry.
pub struct OraclePipeline {
    config: GeneratorConfig,
    registry: SubjectRegistry,
    corpus: TestCorpus,
    tokenizer_provider: Option<Box<dyn TokenizerProvider>>,
    config_provider: Option<Box<dyn ConfigProvider>>,
    transform: Option<Box<dyn FourierTransform>>,
}

impl OraclePipeline {
    /// Create a pipeline over `registry` with the curated corpus.
    pub fn new(registry: SubjectRegistry, config: GeneratorConfig) -> Self {
        Self {
            config,
            registry,
            corpus: TestCorpus::curated(),
            tokenizer_provider: None,
            config_provider: None,
            transform: None,
        }
    }

    /// Replace the corpus driven through every tokenizer subject.
    pub fn set_corpus(&mut self, corpus: TestCorpus) {
        self.corpus = corpus;
    }

    /// Register the tokenizer collaborator. Required before [`Self::run`].
    pub fn register_tokenizer_provider(&mut self, provider: Box<dyn TokenizerProvider>) {
        self.tokenizer_provider = Some(provider);
    }

    /// Register the configuration collaborator. Required before [`Self::run`].
    pub fn register_config_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        self.config_provider = Some(provider);
    }

    /// Register the spectral transform. Required before [`Self::run`].
    pub fn register_transform(&mut self, transform: Box<dyn FourierTransform>) {
        self.transform = Some(transform);
    }

    /// Run all three passes and write their bundles.
    ///
    /// Fails up front when a collaborator is missing and mid-run when the
    /// spectral pass does; tokenizer and configuration bundles written
    /// before that point stay on disk.
    pub fn run(&mut self) -> Result<RunSummary, OracleError> {
        let tokenizer_provider = self.tokenizer_provider.as_deref().ok_or_else(|| {
            OracleError::Configuration("no tokenizer provider registered".to_string())
        })?;
        let config_provider = self.config_provider.as_deref().ok_or_else(|| {
            OracleError::Configuration("no configuration provider registered".to_string())
        })?;
        let transform = self
            .transform
            .as_deref_mut()
            .ok_or_else(|| OracleError::Configuration("no spectral transform registered".to_string()))?;

        let writer = OracleWriter::new(&self.config.data_dir);
        let mut summary = RunSummary::default();

        let tokenizer_subjects =
            SubjectSet::build(&self.registry, &self.config.supplement, &self.config.policy);
        let generator = TokenizerOracleGenerator::new(tokenizer_provider, &self.corpus);
        let (tokenizer_records, tokenizer_report) = generator.generate(&tokenizer_subjects);
        summary.tokenizer = tokenizer_report;
        match writer.write_tokenizer_bundle(&tokenizer_records) {
            Ok(path) => summary.written.push(path),
            Err(err) => summary
                .write_failures
                .push((TOKENIZER_BUNDLE_FILE.to_string(), err)),
        }

        // The curated supplement applies to tokenizer coverage only.
        let config_subjects =
            SubjectSet::build(&self.registry, &SupplementalSubjects::none(), &self.config.policy);
        let generator = ConfigOracleGenerator::new(config_provider);
        let (config_records, config_report) = generator.generate(&config_subjects);
        summary.config = config_report;
        match writer.write_config_bundle(&config_records) {
            Ok(path) => summary.written.push(path),
            Err(err) => summary
                .write_failures
                .push((CONFIG_BUNDLE_FILE.to_string(), err)),
        }

        let schedule = SizeSchedule::standard();
        eprintln!(
            "[goldens:spectral] generating {} case(s)",
            schedule.len() * 2
        );
        let generator = SpectralOracleGenerator::new(schedule, self.config.spectral_seed);
        let spectral_records = generator.generate(transform)?;
        summary.spectral_cases = spectral_records.len();
        match writer.write_spectral_bundle(&spectral_records) {
            Ok(path) => summary.written.push(path),
            Err(err) => summary
                .write_failures
                .push((SPECTRAL_BUNDLE_FILE.to_string(), err)),
        }

        info!(
            tokenizer_subjects = summary.tokenizer.subjects_written,
            config_subjects = summary.config.subjects_written,
            spectral_cases = summary.spectral_cases,
            bundles = summary.written.len(),
            "oracle generation finished"
        );
        Ok(summary)
    }
}
