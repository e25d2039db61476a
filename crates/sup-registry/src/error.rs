//! Error types for registry operations.

use std::path::PathBuf;

use semver::{Version, VersionReq};
use sup_core::manifest::ManifestError;
use sup_core::types::PackageName;
use thiserror::Error;

/// Errors that can occur when publishing to, indexing, or resolving from
/// a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A manifest failed to load or validate.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    /// A pack/unpack error occurred.
    #[error("pack error: {0}")]
    Pack(#[from] sup_pack::error::PackError),
    /// A domain value failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] sup_core::types::ValidationError),
    /// A JSON encode/decode failure, e.g. a corrupt index file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The registry has no index file.
    #[error("registry '{0}' has no index; run the index command after publishing")]
    NotIndexed(PathBuf),
    /// The version being published already exists in the registry.
    #[error("{name}@{version} is already published; published versions are immutable")]
    AlreadyPublished {
        /// Package name.
        name: PackageName,
        /// Version that already exists.
        version: Version,
    },
    /// Two stamped manifests describe the same version.
    #[error("duplicate manifests for {name}@{version} in registry")]
    DuplicateVersion {
        /// Package name.
        name: PackageName,
        /// Duplicated version.
        version: Version,
    },
    /// A stamped manifest sits in a directory that does not match its contents.
    #[error("manifest at '{path}' does not match its registry location")]
    PathMismatch {
        /// Path of the offending manifest.
        path: PathBuf,
    },
    /// A registry manifest is missing its stamped digest.
    #[error("manifest at '{path}' has no stamped sha256 digest")]
    MissingDigest {
        /// Path of the offending manifest.
        path: PathBuf,
    },
    /// The requested package name is not in the index.
    #[error("package '{0}' not found in registry index")]
    UnknownPackage(PackageName),
    /// The requested pinned version is not in the index.
    #[error("version {version} of '{name}' not found in registry index")]
    UnknownVersion {
        /// Package name.
        name: PackageName,
        /// Missing version.
        version: Version,
    },
    /// No indexed version satisfies a dependency requirement.
    #[error("no version of '{name}' satisfies requirement '{req}'")]
    NoVersionMatches {
        /// Package name.
        name: PackageName,
        /// Unsatisfied requirement.
        req: VersionReq,
    },
}
