//! Registry store: publishes artifacts into the registry tree and resolves
//! packages out of it for installation.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info};
use semver::{Version, VersionReq};
use sha2::{Digest, Sha256};

use sup_core::manifest::Manifest;
use sup_core::package_ref::PackageRef;
use sup_core::types::{PackageName, Sha256Digest};
use sup_pack::pack::pack_directory;

use crate::error::RegistryError;
use crate::index::RegistryIndex;

/// A package resolved out of a registry: its stamped manifest and the raw
/// tarball bytes, ready for digest verification and unpacking.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// The stamped manifest stored alongside the artifact.
    pub manifest: Manifest,
    /// Tarball bytes.
    pub tarball: Vec<u8>,
}

/// Resolves package references to installable packages.
///
/// The installer works against this trait so tests can substitute an
/// in-memory source for a real registry directory.
pub trait PackageSource: Send + Sync {
    /// Resolve a package reference to its pinned (or highest) version.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the package is unknown or unreadable.
    fn resolve(&self, pkg_ref: &PackageRef) -> Result<ResolvedPackage, RegistryError>;

    /// Highest available version of `name` satisfying `req`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if nothing satisfies the requirement.
    fn best_match(&self, name: &PackageName, req: &VersionReq)
        -> Result<Version, RegistryError>;
}

/// A registry rooted at a local directory.
#[derive(Debug)]
pub struct RegistryStore {
    root: PathBuf,
    index: OnceLock<RegistryIndex>,
}

impl RegistryStore {
    /// Open a registry at `root`. The directory is created lazily on the
    /// first publish; resolution against a nonexistent registry fails with
    /// [`RegistryError::NotIndexed`].
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: OnceLock::new(),
        }
    }

    /// Registry root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Publish the package described by the manifest at `manifest_path`.
    ///
    /// The manifest's directory is packed into a tarball, the tarball's
    /// SHA-256 is stamped into a manifest copy, and both land under
    /// `<root>/<name>/<version>/`. Files are staged inside the registry root
    /// and moved into place with atomic renames.
    ///
    /// Returns the stamped manifest.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyPublished`] if the version exists,
    /// or any validation, pack, or I/O error.
    pub fn publish(&self, manifest_path: &Path) -> Result<Manifest, RegistryError> {
        let manifest = Manifest::load(manifest_path)?;
        manifest.validate_source()?;

        let dest_dir = self
            .root
            .join(manifest.name.as_str())
            .join(manifest.version.to_string());
        if dest_dir.exists() {
            return Err(RegistryError::AlreadyPublished {
                name: manifest.name,
                version: manifest.version,
            });
        }

        let payload_dir = match manifest_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let manifest_file = manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                RegistryError::Io(std::io::Error::other("manifest path has no file name"))
            })?;

        std::fs::create_dir_all(&self.root)?;

        let staged = tempfile::NamedTempFile::new_in(&self.root)?;
        pack_directory(payload_dir, &manifest_file, staged.path())?;
        let tarball = std::fs::read(staged.path())?;
        let sha256 = Sha256Digest::from_hex(&hex::encode(Sha256::digest(&tarball)))?;
        debug!("packed {} ({} bytes, sha256 {sha256})", manifest.name, tarball.len());

        let stamped = Manifest {
            sha256: Some(sha256),
            ..manifest
        };

        std::fs::create_dir_all(&dest_dir)?;
        staged
            .persist(dest_dir.join(stamped.artifact_file_name()))
            .map_err(|e| e.error)?;

        let staged_manifest = tempfile::NamedTempFile::new_in(&self.root)?;
        std::fs::write(
            staged_manifest.path(),
            serde_json::to_string_pretty(&stamped)?,
        )?;
        staged_manifest
            .persist(dest_dir.join(stamped.stamped_file_name()))
            .map_err(|e| e.error)?;

        info!(
            "published {}@{} to {}",
            stamped.name,
            stamped.version,
            dest_dir.display()
        );
        Ok(stamped)
    }

    /// Rebuild and persist the registry index, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the scan finds a malformed entry or the
    /// index cannot be written.
    pub fn rebuild_index(&self) -> Result<RegistryIndex, RegistryError> {
        std::fs::create_dir_all(&self.root)?;
        let index = RegistryIndex::build(&self.root)?;
        index.save(&self.root)?;
        info!(
            "indexed {} version(s) in {}",
            index.len(),
            self.root.display()
        );
        Ok(index)
    }

    /// The registry's persisted index, loaded once per store instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotIndexed`] if the registry has never been
    /// indexed.
    pub fn index(&self) -> Result<&RegistryIndex, RegistryError> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let loaded = RegistryIndex::load(&self.root)?;
        Ok(self.index.get_or_init(|| loaded))
    }

    fn version_dir(&self, name: &PackageName, version: &Version) -> PathBuf {
        self.root.join(name.as_str()).join(version.to_string())
    }
}

impl PackageSource for RegistryStore {
    fn resolve(&self, pkg_ref: &PackageRef) -> Result<ResolvedPackage, RegistryError> {
        let index = self.index()?;
        let (version, _entry) = index.resolve(&pkg_ref.name, pkg_ref.version.as_ref())?;

        let dir = self.version_dir(&pkg_ref.name, version);
        let manifest = Manifest::load(
            &dir.join(format!("{}-{}.pkg.json", pkg_ref.name, version)),
        )?;
        let tarball = std::fs::read(dir.join(manifest.artifact_file_name()))?;

        debug!("resolved {pkg_ref} to {}@{version}", pkg_ref.name);
        Ok(ResolvedPackage { manifest, tarball })
    }

    fn best_match(
        &self,
        name: &PackageName,
        req: &VersionReq,
    ) -> Result<Version, RegistryError> {
        let (version, _) = self.index()?.best_match(name, req)?;
        Ok(version.clone())
    }
}
