/// Constants used by subject selection and the curated default policy.
pub mod registry {
    /// Tokenizer-only subjects merged into the tokenizer selection per category.
    ///
    /// These cover model families whose full model is unsupported downstream
    /// but whose tokenizer alone is testable.
    pub const SUPPLEMENTAL_TOKENIZER_SUBJECTS: &[(&str, &[&str])] = &[
        ("falcon", &["tiiuae/falcon-7b"]),
        (
            "llama",
            &[
                "hf-internal-testing/llama-tokenizer",
                "hf-internal-testing/llama-code-tokenizer",
            ],
        ),
        ("mpt", &["mosaicml/mpt-7b"]),
    ];
    /// Categories excluded from generation entirely.
    pub const EXCLUDED_CATEGORIES: &[&str] = &["xlm", "marian", "speecht5"];
    /// Individual subjects excluded from generation entirely.
    pub const EXCLUDED_SUBJECTS: &[&str] = &["facebook/m2m100_418M"];
    /// Per-category caps applied by front-truncating the identifier sequence.
    pub const CATEGORY_CAPS: &[(&str, usize)] = &[("marian", 10)];
}

/// Constants governing the spectral case schedule and seeding.
pub mod spectral {
    /// Default seed for the spectral input stream.
    pub const DEFAULT_SEED: u64 = 0;
    /// Geometric progressions as (base, highest exponent); exponents start at 1.
    pub const PROGRESSIONS: &[(usize, u32)] = &[(2, 9), (3, 7), (5, 5), (7, 3)];
    /// Prefix for spectral case keys.
    pub const CASE_KEY_PREFIX: &str = "fft";
    /// Domain tag for real-valued cases.
    pub const DOMAIN_REAL: &str = "real";
    /// Domain tag for complex-valued cases.
    pub const DOMAIN_COMPLEX: &str = "complex";
}

/// Constants naming bundle files and default locations.
pub mod bundles {
    /// Filename for the tokenizer oracle bundle.
    pub const TOKENIZER_BUNDLE_FILE: &str = "tokenizer_tests.json";
    /// Filename for the config oracle bundle.
    pub const CONFIG_BUNDLE_FILE: &str = "config_tests.json";
    /// Filename for the spectral oracle bundle.
    pub const SPECTRAL_BUNDLE_FILE: &str = "fft_tests.json";
    /// Default directory receiving bundle files.
    pub const DEFAULT_DATA_DIR: &str = "data";
    /// Default path for the subject registry document.
    pub const DEFAULT_REGISTRY_FILE: &str = "data/registry.json";
}

/// Constants naming tokenizer encode output fields.
pub mod tokenizer {
    /// Field carrying the primary token id sequence in encode output.
    pub const INPUT_IDS_FIELD: &str = "input_ids";
    /// Field carrying the attention mask in encode output.
    pub const ATTENTION_MASK_FIELD: &str = "attention_mask";
    /// Field carrying segment ids in encode output, when the tokenizer emits them.
    pub const TOKEN_TYPE_IDS_FIELD: &str = "token_type_ids";
}

/// Constants for config canonicalization.
pub mod config {
    /// Environment-dependent fields removed from canonical config maps.
    pub const NON_PORTABLE_FIELDS: &[&str] = &["torch_dtype"];
}
