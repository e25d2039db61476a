//! Error types for pack/unpack operations.

use thiserror::Error;

/// Errors that can occur when packing or unpacking a `.sup.gz` tarball.
#[derive(Debug, Error)]
pub enum PackError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The payload directory does not contain the expected manifest file.
    #[error("manifest '{0}' not found in payload directory")]
    MissingManifest(String),
}
