//! The registry lookup index (`index.json`), built by the index operation
//! and consulted by every install.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use sup_core::manifest::Manifest;
use sup_core::types::{PackageName, Sha256Digest};
use walkdir::WalkDir;

use crate::error::RegistryError;

/// File name of the index at the registry root.
pub const INDEX_FILE: &str = "index.json";

/// Index record for one published version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// SHA-256 digest of the published tarball.
    pub sha256: Sha256Digest,
    /// Package description, copied from the manifest for display.
    pub description: String,
    /// Dependency requirements, copied from the manifest for resolution.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub depends: BTreeMap<PackageName, VersionReq>,
}

/// Lookup index over every published package version in a registry.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistryIndex {
    /// Package name to version to index record.
    pub packages: BTreeMap<PackageName, BTreeMap<Version, IndexEntry>>,
}

impl RegistryIndex {
    /// Build an index by scanning every stamped manifest under `root`.
    ///
    /// The scan expects the `name/version/name-version.pkg.json` layout
    /// written by publish; manifests in mismatched directories, without a
    /// stamped digest, or duplicating a version fail the build.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on I/O failure or any malformed entry.
    pub fn build(root: &Path) -> Result<Self, RegistryError> {
        let mut index = Self::default();

        for entry in WalkDir::new(root).min_depth(3).max_depth(3) {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !path.to_string_lossy().ends_with(".pkg.json") {
                continue;
            }

            debug!("indexing: {}", path.display());
            let manifest = Manifest::load(path)?;
            manifest.validate()?;

            let Some(sha256) = manifest.sha256.clone() else {
                return Err(RegistryError::MissingDigest {
                    path: path.to_path_buf(),
                });
            };

            // The directory pair above the manifest must agree with it.
            let version_dir = path.parent().and_then(Path::file_name);
            let name_dir = path
                .parent()
                .and_then(Path::parent)
                .and_then(Path::file_name);
            let located_ok = version_dir
                .is_some_and(|d| d.to_string_lossy() == manifest.version.to_string())
                && name_dir.is_some_and(|d| d.to_string_lossy() == manifest.name.as_str());
            if !located_ok {
                return Err(RegistryError::PathMismatch {
                    path: path.to_path_buf(),
                });
            }

            let versions = index.packages.entry(manifest.name.clone()).or_default();
            if versions.contains_key(&manifest.version) {
                return Err(RegistryError::DuplicateVersion {
                    name: manifest.name,
                    version: manifest.version,
                });
            }
            versions.insert(
                manifest.version,
                IndexEntry {
                    sha256,
                    description: manifest.description,
                    depends: manifest.depends,
                },
            );
        }

        Ok(index)
    }

    /// Load the index file from the registry at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotIndexed`] if no index file exists, or
    /// [`RegistryError::Json`] if it cannot be parsed.
    pub fn load(root: &Path) -> Result<Self, RegistryError> {
        let path = root.join(INDEX_FILE);
        if !path.exists() {
            return Err(RegistryError::NotIndexed(root.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the index to the registry at `root` via a temp file and an
    /// atomic rename.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be written.
    pub fn save(&self, root: &Path) -> Result<(), RegistryError> {
        let tmp = tempfile::NamedTempFile::new_in(root)?;
        std::fs::write(tmp.path(), serde_json::to_string_pretty(self)?)?;
        tmp.persist(root.join(INDEX_FILE)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Number of indexed versions across all packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.values().map(BTreeMap::len).sum()
    }

    /// True if the index contains no versions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Resolve `name` at a pinned `version`, or the highest published
    /// version when `version` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownPackage`] or
    /// [`RegistryError::UnknownVersion`] if nothing matches.
    pub fn resolve(
        &self,
        name: &PackageName,
        version: Option<&Version>,
    ) -> Result<(&Version, &IndexEntry), RegistryError> {
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPackage(name.clone()))?;
        match version {
            Some(v) => versions
                .get_key_value(v)
                .ok_or_else(|| RegistryError::UnknownVersion {
                    name: name.clone(),
                    version: v.clone(),
                }),
            None => versions
                .last_key_value()
                .ok_or_else(|| RegistryError::UnknownPackage(name.clone())),
        }
    }

    /// Highest published version of `name` satisfying `req`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownPackage`] if the name is absent, or
    /// [`RegistryError::NoVersionMatches`] if no version satisfies `req`.
    pub fn best_match(
        &self,
        name: &PackageName,
        req: &VersionReq,
    ) -> Result<(&Version, &IndexEntry), RegistryError> {
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPackage(name.clone()))?;
        versions
            .iter()
            .rev()
            .find(|(v, _)| req.matches(v))
            .ok_or_else(|| RegistryError::NoVersionMatches {
                name: name.clone(),
                req: req.clone(),
            })
    }
}
