//! Records of packages installed in the local store, and the on-disk
//! database (`installed.json`) that tracks them.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::package_ref::PackageRef;
use crate::types::{PackageName, Sha256Digest};

/// Errors produced by install-database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be read or written.
    #[error("install database I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The database file is not valid JSON.
    #[error("corrupt install database: {0}")]
    Json(#[from] serde_json::Error),
}

/// A package installed in the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name.
    pub name: PackageName,
    /// Pinned installed version.
    pub version: Version,
    /// SHA-256 digest of the tarball the install was unpacked from.
    pub sha256: Sha256Digest,
    /// Path of the registry the package was installed from.
    pub registry: PathBuf,
    /// Absolute path to the unpacked package directory.
    pub install_path: PathBuf,
}

/// The local install database, persisted as `installed.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InstallDb {
    /// All installed packages, in install order.
    pub packages: Vec<InstalledPackage>,
}

impl InstallDb {
    /// Load the database from `path`. A missing file is an empty database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DbError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the database to `path`, creating parent directories if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), DbError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// True if `name@version` is already installed.
    #[must_use]
    pub fn contains(&self, name: &PackageName, version: &Version) -> bool {
        self.packages
            .iter()
            .any(|p| &p.name == name && &p.version == version)
    }

    /// All installed records matching `pkg_ref`: the pinned version if one
    /// is given, otherwise every installed version of the name.
    #[must_use]
    pub fn matching(&self, pkg_ref: &PackageRef) -> Vec<&InstalledPackage> {
        self.packages
            .iter()
            .filter(|p| {
                p.name == pkg_ref.name
                    && pkg_ref.version.as_ref().is_none_or(|v| v == &p.version)
            })
            .collect()
    }

    /// Append a record.
    pub fn add(&mut self, pkg: InstalledPackage) {
        self.packages.push(pkg);
    }

    /// Remove the record for `name@version`, returning it if present.
    pub fn remove(&mut self, name: &PackageName, version: &Version) -> Option<InstalledPackage> {
        let idx = self
            .packages
            .iter()
            .position(|p| &p.name == name && &p.version == version)?;
        Some(self.packages.remove(idx))
    }
}
