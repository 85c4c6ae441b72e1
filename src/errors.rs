use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for registry loading, spectral generation, and bundle IO failures.
///
/// Graceful-degradation skips (unavailable subjects, incompatible texts) are
/// not errors and never appear here; they are modeled as outcome values on the
/// provider seam.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The registry document could not be read or parsed.
    #[error("failed loading subject registry from {}: {reason}", .path.display())]
    RegistryLoad {
        /// Path of the registry document.
        path: PathBuf,
        /// Read or parse failure description.
        reason: String,
    },
    /// The spectral transform misbehaved; the whole run aborts.
    #[error("spectral transform failed for size {size}: {reason}")]
    Transform {
        /// Case size whose transform failed.
        size: usize,
        /// Transform failure description.
        reason: String,
    },
    /// A bundle file could not be written.
    #[error("failed writing oracle bundle to {}: {source}", .path.display())]
    BundleWrite {
        /// Path of the bundle being written.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },
    /// Filesystem failure outside bundle writing.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A payload could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The pipeline was asked to run without a required collaborator.
    #[error("configuration error: {0}")]
    Configuration(String),
}
