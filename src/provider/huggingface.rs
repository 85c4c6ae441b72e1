//! Hub-backed tokenizer and configuration providers.
//!
//! Artifacts are fetched through the hf-hub cache, so repeated runs reuse
//! previously downloaded files. A fetch failure is reported as
//! `NotApplicable` (the subject publishes no such artifact); a file that
//! downloads but fails to parse is reported as `Failed`.

use std::fs;

use hf_hub::Repo;
use hf_hub::RepoType;
use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use serde_json::{Map, Value};
use tokenizers::Tokenizer;
use tokenizers::models::ModelWrapper;
use tracing::debug;

use crate::constants::tokenizer::{ATTENTION_MASK_FIELD, INPUT_IDS_FIELD, TOKEN_TYPE_IDS_FIELD};
use crate::provider::{
    Acquisition, ConfigHandle, ConfigProvider, DropoutControl, TextFailure, TokenFields,
    TokenizerHandle, TokenizerProvider,
};

const TOKENIZER_ARTIFACT: &str = "tokenizer.json";
const CONFIG_ARTIFACT: &str = "config.json";

fn model_repo(subject: &str) -> Result<ApiRepo, String> {
    let api = ApiBuilder::new()
        .with_progress(true)
        .with_retries(5)
        .with_token(None)
        .build()
        .map_err(|err| format!("failed building hf-hub client: {err}"))?;
    Ok(api.repo(Repo::new(subject.to_string(), RepoType::Model)))
}

/// Tokenizer provider backed by `tokenizer.json` artifacts on the Hub.
#[derive(Clone, Debug, Default)]
pub struct HubTokenizerProvider;

impl HubTokenizerProvider {
    /// Create a provider using the default hf-hub cache location.
    pub fn new() -> Self {
        Self
    }
}

impl TokenizerProvider for HubTokenizerProvider {
    fn acquire(&self, subject: &str) -> Acquisition<Box<dyn TokenizerHandle>> {
        let repo = match model_repo(subject) {
            Ok(repo) => repo,
            Err(reason) => return Acquisition::Failed(reason),
        };
        let artifact = match repo.get(TOKENIZER_ARTIFACT) {
            Ok(path) => path,
            Err(err) => {
                debug!(subject, error = %err, "no tokenizer artifact; subject skipped");
                return Acquisition::NotApplicable;
            }
        };
        match Tokenizer::from_file(&artifact) {
            Ok(tokenizer) => Acquisition::Ready(Box::new(HubTokenizerHandle { tokenizer })),
            Err(err) => Acquisition::Failed(format!(
                "failed loading tokenizer artifact {}: {err}",
                artifact.display()
            )),
        }
    }
}

struct HubTokenizerHandle {
    tokenizer: Tokenizer,
}

impl TokenizerHandle for HubTokenizerHandle {
    fn encode(&self, text: &str) -> Result<TokenFields, TextFailure> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|err| TextFailure::new(err.to_string()))?;

        let mut fields = TokenFields::new();
        fields.insert(INPUT_IDS_FIELD.to_string(), encoding.get_ids().to_vec());
        fields.insert(
            TOKEN_TYPE_IDS_FIELD.to_string(),
            encoding.get_type_ids().to_vec(),
        );
        fields.insert(
            ATTENTION_MASK_FIELD.to_string(),
            encoding.get_attention_mask().to_vec(),
        );
        Ok(fields)
    }

    fn decode(&self, ids: &[u32], keep_special: bool) -> Result<String, TextFailure> {
        self.tokenizer
            .decode(ids, !keep_special)
            .map_err(|err| TextFailure::new(err.to_string()))
    }

    fn dropout_control(&mut self) -> Option<&mut dyn DropoutControl> {
        match self.tokenizer.get_model() {
            ModelWrapper::BPE(_) => Some(self),
            _ => None,
        }
    }
}

impl DropoutControl for HubTokenizerHandle {
    fn disable_dropout(&mut self) {
        let mut model = self.tokenizer.get_model().clone();
        if let ModelWrapper::BPE(ref mut bpe) = model {
            bpe.dropout = None;
            self.tokenizer.with_model(model);
        }
    }
}

/// Config provider backed by `config.json` artifacts on the Hub.
#[derive(Clone, Debug, Default)]
pub struct HubConfigProvider;

impl HubConfigProvider {
    /// Create a provider using the default hf-hub cache location.
    pub fn new() -> Self {
        Self
    }
}

impl ConfigProvider for HubConfigProvider {
    fn acquire(&self, subject: &str) -> Acquisition<Box<dyn ConfigHandle>> {
        let repo = match model_repo(subject) {
            Ok(repo) => repo,
            Err(reason) => return Acquisition::Failed(reason),
        };
        let artifact = match repo.get(CONFIG_ARTIFACT) {
            Ok(path) => path,
            Err(err) => {
                debug!(subject, error = %err, "no config artifact; subject skipped");
                return Acquisition::NotApplicable;
            }
        };
        let raw = match fs::read_to_string(&artifact) {
            Ok(raw) => raw,
            Err(err) => {
                return Acquisition::Failed(format!(
                    "failed reading config artifact {}: {err}",
                    artifact.display()
                ));
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(fields) => Acquisition::Ready(Box::new(HubConfigHandle { fields })),
            Err(err) => Acquisition::Failed(format!(
                "failed parsing config artifact {}: {err}",
                artifact.display()
            )),
        }
    }
}

struct HubConfigHandle {
    fields: Map<String, Value>,
}

impl ConfigHandle for HubConfigHandle {
    fn canonical_fields(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}
