//! Bundle serialization.
//!
//! Each oracle set lands in its own JSON file under the data directory.
//! The directory is created on demand and existing bundles are replaced,
//! so a rerun always reflects the latest pass. Bundles are independent:
//! one failed write never blocks the others.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config_oracle::ConfigOracleSet;
use crate::constants::bundles::{CONFIG_BUNDLE_FILE, SPECTRAL_BUNDLE_FILE, TOKENIZER_BUNDLE_FILE};
use crate::errors::OracleError;
use crate::spectral::SpectralOracleRecord;
use crate::tokenizer_oracle::TokenizerOracleSet;
use crate::types::CaseKey;

/// Writes oracle bundles beneath a single data directory.
#[derive(Clone, Debug)]
pub struct OracleWriter {
    data_dir: PathBuf,
}

impl OracleWriter {
    /// Create a writer rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory all bundles are written beneath.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write the tokenizer bundle, returning its path.
    pub fn write_tokenizer_bundle(
        &self,
        records: &TokenizerOracleSet,
    ) -> Result<PathBuf, OracleError> {
        self.write_json(TOKENIZER_BUNDLE_FILE, records)
    }

    /// Write the configuration bundle, returning its path.
    pub fn write_config_bundle(&self, records: &ConfigOracleSet) -> Result<PathBuf, OracleError> {
        self.write_json(CONFIG_BUNDLE_FILE, records)
    }

    /// Write the spectral bundle, returning its path.
    pub fn write_spectral_bundle(
        &self,
        records: &IndexMap<CaseKey, SpectralOracleRecord>,
    ) -> Result<PathBuf, OracleError> {
        self.write_json(SPECTRAL_BUNDLE_FILE, records)
    }

    fn write_json<T: Serialize>(&self, file_name: &str, payload: &T) -> Result<PathBuf, OracleError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|err| OracleError::BundleWrite {
            path: self.data_dir.clone(),
            source: err,
        })?;
        let path = self.data_dir.join(file_name);
        let rendered = serde_json::to_string_pretty(payload)?;
        std::fs::write(&path, rendered).map_err(|err| OracleError::BundleWrite {
            path: path.clone(),
            source: err,
        })?;
        debug!(path = %path.display(), "bundle written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::{Map, Value, json};

    use crate::spectral::SpectralOracleRecord;

    #[test]
    fn bundles_land_in_distinct_files_under_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OracleWriter::new(dir.path());

        let tokenizer_path = writer.write_tokenizer_bundle(&IndexMap::new()).unwrap();
        let config_path = writer.write_config_bundle(&IndexMap::new()).unwrap();
        let spectral_path = writer.write_spectral_bundle(&IndexMap::new()).unwrap();

        assert_eq!(tokenizer_path, dir.path().join("tokenizer_tests.json"));
        assert_eq!(config_path, dir.path().join("config_tests.json"));
        assert_eq!(spectral_path, dir.path().join("fft_tests.json"));
        assert!(tokenizer_path.exists());
        assert!(config_path.exists());
        assert!(spectral_path.exists());
    }

    #[test]
    fn missing_data_dir_is_created_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("data");
        let writer = OracleWriter::new(&nested);

        let path = writer.write_config_bundle(&IndexMap::new()).unwrap();

        assert!(nested.is_dir());
        assert!(path.exists());
    }

    #[test]
    fn rewriting_a_bundle_replaces_its_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OracleWriter::new(dir.path());

        let mut first = IndexMap::new();
        first.insert("family/model".to_string(), Map::new());
        writer.write_config_bundle(&first).unwrap();

        let mut fields = Map::new();
        fields.insert("vocab_size".to_string(), json!(100));
        let mut second = IndexMap::new();
        second.insert("family/other".to_string(), fields);
        let path = writer.write_config_bundle(&second).unwrap();

        let reread: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert!(reread.get("family/model").is_none());
        assert_eq!(reread["family/other"]["vocab_size"], json!(100));
    }

    #[test]
    fn spectral_records_round_trip_through_the_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OracleWriter::new(dir.path());

        let mut records = IndexMap::new();
        records.insert(
            "fft_2_real".to_string(),
            SpectralOracleRecord {
                complex: false,
                input: vec![1.0, 2.0],
                output: vec![3.0, 0.0, -1.0, 0.0],
            },
        );
        let path = writer.write_spectral_bundle(&records).unwrap();

        let reread: IndexMap<String, SpectralOracleRecord> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(reread, records);
    }
}
