use std::path::PathBuf;

use crate::constants::{bundles, spectral};
use crate::registry::{ExclusionPolicy, SupplementalSubjects};

/// Top-level generator configuration.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Directory the oracle bundles are written into.
    pub data_dir: PathBuf,
    /// RNG seed that controls deterministic spectral input synthesis.
    pub spectral_seed: u64,
    /// Selection policy applied while building the subject set.
    pub policy: ExclusionPolicy,
    /// Tokenizer-only identifiers merged into selection for the text path.
    ///
    /// The configuration path never sees these; a supplemental subject has a
    /// usable tokenizer but no portable configuration worth capturing.
    pub supplement: SupplementalSubjects,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(bundles::DEFAULT_DATA_DIR),
            spectral_seed: spectral::DEFAULT_SEED,
            policy: ExclusionPolicy::curated(),
            supplement: SupplementalSubjects::curated(),
        }
    }
}
