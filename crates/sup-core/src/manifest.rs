//! Package manifest type representing a `<name>.pkg.json` file.

use std::collections::BTreeMap;
use std::path::Path;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PackageName, Sha256Digest, ValidationError};

/// File extension for packed package artifacts.
pub const ARTIFACT_EXT: &str = "sup.gz";

/// File extension for package manifests.
pub const MANIFEST_EXT: &str = "pkg.json";

/// Errors produced when loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),
    /// The manifest is not valid JSON or is missing required fields.
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
    /// A field failed slug/digest validation.
    #[error("invalid field '{field}': {source}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Underlying validation failure.
        source: ValidationError,
    },
    /// The description is empty after trimming.
    #[error("description must not be empty")]
    EmptyDescription,
    /// A source manifest already carries a tarball digest.
    #[error("manifest carries a sha256 digest; digests are stamped at publish time")]
    AlreadyStamped,
}

/// The contents of a `<name>.pkg.json` package manifest.
///
/// The manifest's parent directory is the package payload; `publish`
/// archives that directory and stamps the tarball digest into the copy
/// stored in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name slug.
    pub name: PackageName,
    /// Package version (semver).
    pub version: Version,
    /// Human-readable description.
    pub description: String,
    /// Optional SPDX-style license identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Dependencies: package name to semver requirement.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub depends: BTreeMap<PackageName, VersionReq>,
    /// SHA-256 hex digest of the published tarball. Absent in source
    /// manifests; present only in registry-stamped copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<Sha256Digest>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Validate field contents beyond what deserialization enforces.
    ///
    /// Serde guarantees the shape (semver versions and requirements parse);
    /// this re-checks the slug rules on `name` and every dependency key and
    /// requires a non-empty description.
    ///
    /// # Errors
    ///
    /// Returns the first [`ManifestError`] encountered.
    pub fn validate(&self) -> Result<(), ManifestError> {
        PackageName::new(self.name.as_str())
            .map_err(|source| ManifestError::InvalidField {
                field: "name",
                source,
            })?;
        if self.description.trim().is_empty() {
            return Err(ManifestError::EmptyDescription);
        }
        for dep in self.depends.keys() {
            PackageName::new(dep.as_str()).map_err(|source| ManifestError::InvalidField {
                field: "depends",
                source,
            })?;
        }
        Ok(())
    }

    /// Validate a source manifest as `check` does: field rules plus the
    /// requirement that no digest has been stamped yet.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::AlreadyStamped`] if a `sha256` field is
    /// present, or any error from [`Manifest::validate`].
    pub fn validate_source(&self) -> Result<(), ManifestError> {
        self.validate()?;
        if self.sha256.is_some() {
            return Err(ManifestError::AlreadyStamped);
        }
        Ok(())
    }

    /// File name of the packed artifact for this manifest, e.g. `gcd-1.0.2.sup.gz`.
    #[must_use]
    pub fn artifact_file_name(&self) -> String {
        format!("{}-{}.{ARTIFACT_EXT}", self.name, self.version)
    }

    /// File name of the registry-stamped manifest copy, e.g. `gcd-1.0.2.pkg.json`.
    #[must_use]
    pub fn stamped_file_name(&self) -> String {
        format!("{}-{}.{MANIFEST_EXT}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(raw: &str) -> Result<Manifest, ManifestError> {
        Ok(serde_json::from_str(raw)?)
    }

    #[test]
    fn minimal_manifest_parses_and_validates() {
        let m = minimal(
            r#"{"name":"gcd","version":"1.0.2","description":"GCD reference design"}"#,
        )
        .unwrap();
        m.validate_source().unwrap();
        assert_eq!(m.artifact_file_name(), "gcd-1.0.2.sup.gz");
        assert!(m.depends.is_empty());
    }

    #[test]
    fn missing_version_is_rejected() {
        assert!(minimal(r#"{"name":"gcd","description":"x"}"#).is_err());
    }

    #[test]
    fn bad_semver_is_rejected() {
        assert!(minimal(r#"{"name":"gcd","version":"one","description":"x"}"#).is_err());
    }

    #[test]
    fn empty_description_is_rejected() {
        let m = minimal(r#"{"name":"gcd","version":"1.0.0","description":"  "}"#).unwrap();
        assert!(matches!(
            m.validate().unwrap_err(),
            ManifestError::EmptyDescription
        ));
    }

    #[test]
    fn stamped_source_manifest_is_rejected() {
        let m = minimal(&format!(
            r#"{{"name":"gcd","version":"1.0.0","description":"ok","sha256":"{}"}}"#,
            "a".repeat(64)
        ))
        .unwrap();
        assert!(matches!(
            m.validate_source().unwrap_err(),
            ManifestError::AlreadyStamped
        ));
        m.validate().unwrap();
    }

    #[test]
    fn depends_roundtrips() {
        let m = minimal(
            r#"{"name":"top","version":"2.0.0","description":"top-level design",
                "depends":{"gcd":"^1.0","uart":"=0.3.1"}}"#,
        )
        .unwrap();
        m.validate_source().unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.depends.len(), 2);
    }
}
