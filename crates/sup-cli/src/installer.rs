//! Orchestrates the full package install pipeline: resolve, verify,
//! unpack, record.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use sha2::{Digest, Sha256};
use thiserror::Error;

use sup_core::installed::{DbError, InstallDb, InstalledPackage};
use sup_core::package_ref::PackageRef;
use sup_core::types::{PackageName, Sha256Digest};
use sup_pack::unpack::unpack_tarball;
use sup_registry::error::RegistryError;
use sup_registry::store::{PackageSource, ResolvedPackage};

use crate::config::{db_path, packages_root};

/// Errors that can occur during package installation.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The registry returned an error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// The tarball sha256 does not match the stamped manifest.
    #[error("sha256 mismatch: expected {expected}, got {actual}")]
    DigestMismatch {
        /// Expected hex digest from the manifest.
        expected: String,
        /// Actual computed hex digest.
        actual: String,
    },
    /// A registry manifest is missing its stamped digest.
    #[error("registry manifest for '{0}' has no stamped digest")]
    Unstamped(PackageName),
    /// The dependency graph contains a cycle.
    #[error("dependency cycle detected at '{0}'")]
    DependencyCycle(PackageName),
    /// An I/O error occurred during extraction.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A pack/unpack error occurred.
    #[error("pack error: {0}")]
    Pack(#[from] sup_pack::error::PackError),
    /// The install database could not be read or written.
    #[error(transparent)]
    Db(#[from] DbError),
    /// A core validation error occurred.
    #[error("validation error: {0}")]
    Validation(#[from] sup_core::types::ValidationError),
}

/// Orchestrates resolution, verification, and extraction of packages.
pub struct Installer {
    source: Arc<dyn PackageSource>,
    registry_path: PathBuf,
    home: PathBuf,
}

impl Installer {
    /// Create a new `Installer`.
    ///
    /// # Arguments
    ///
    /// * `source` — Package resolution source (normally the registry store).
    /// * `registry_path` — Registry path recorded against each install.
    /// * `home` — sup home directory holding the database and package store.
    pub fn new(source: Arc<dyn PackageSource>, registry_path: PathBuf, home: PathBuf) -> Self {
        Self {
            source,
            registry_path,
            home,
        }
    }

    /// Install `pkg_ref` and any dependencies not already satisfied.
    ///
    /// Dependencies are installed before their dependents. Versions already
    /// in the install database are skipped. Returns the packages newly
    /// installed, in install order; an empty list means everything was
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] if resolution, verification, or extraction
    /// fails. Packages installed before the failure stay installed and
    /// recorded.
    pub fn install(&self, pkg_ref: &PackageRef) -> Result<Vec<InstalledPackage>, InstallError> {
        info!("installing {pkg_ref}");
        let db_file = db_path(&self.home);
        let mut db = InstallDb::load(&db_file)?;

        let mut plan = Vec::new();
        let mut visiting = BTreeSet::new();
        self.plan(pkg_ref, &db, &mut plan, &mut visiting)?;

        let mut installed = Vec::new();
        for resolved in plan {
            if db.contains(&resolved.manifest.name, &resolved.manifest.version) {
                info!(
                    "{}@{} already installed, skipping",
                    resolved.manifest.name, resolved.manifest.version
                );
                continue;
            }
            let record = self.install_one(&resolved)?;
            db.add(record.clone());
            db.save(&db_file)?;
            installed.push(record);
        }
        Ok(installed)
    }

    /// Depth-first dependency walk: dependencies land in `plan` before
    /// their dependents.
    fn plan(
        &self,
        pkg_ref: &PackageRef,
        db: &InstallDb,
        plan: &mut Vec<ResolvedPackage>,
        visiting: &mut BTreeSet<PackageName>,
    ) -> Result<(), InstallError> {
        if visiting.contains(&pkg_ref.name) {
            return Err(InstallError::DependencyCycle(pkg_ref.name.clone()));
        }

        let resolved = self.source.resolve(pkg_ref)?;
        if plan.iter().any(|r| {
            r.manifest.name == resolved.manifest.name
                && r.manifest.version == resolved.manifest.version
        }) {
            return Ok(());
        }

        visiting.insert(pkg_ref.name.clone());
        for (dep, req) in &resolved.manifest.depends {
            let satisfied = db
                .packages
                .iter()
                .any(|p| &p.name == dep && req.matches(&p.version));
            if satisfied {
                debug!("dependency {dep} {req} already satisfied");
                continue;
            }
            let version = self.source.best_match(dep, req)?;
            self.plan(&PackageRef::pinned(dep.clone(), version), db, plan, visiting)?;
        }
        visiting.remove(&pkg_ref.name);

        plan.push(resolved);
        Ok(())
    }

    fn install_one(&self, resolved: &ResolvedPackage) -> Result<InstalledPackage, InstallError> {
        let manifest = &resolved.manifest;
        let expected = manifest
            .sha256
            .as_ref()
            .ok_or_else(|| InstallError::Unstamped(manifest.name.clone()))?;

        let actual_hex = hex::encode(Sha256::digest(&resolved.tarball));
        if actual_hex != expected.as_hex() {
            return Err(InstallError::DigestMismatch {
                expected: expected.as_hex().to_owned(),
                actual: actual_hex,
            });
        }
        debug!("sha256 verified for {}@{}", manifest.name, manifest.version);

        let install_path = packages_root(&self.home)
            .join(manifest.name.as_str())
            .join(manifest.version.to_string());

        // Write tarball to a temp file then unpack
        let tmp = tempfile::NamedTempFile::new()?;
        std::fs::write(tmp.path(), &resolved.tarball)?;
        unpack_tarball(tmp.path(), &install_path)?;

        info!(
            "installed {}@{} to {}",
            manifest.name,
            manifest.version,
            install_path.display()
        );

        Ok(InstalledPackage {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            sha256: Sha256Digest::from_hex(&actual_hex)?,
            registry: self.registry_path.clone(),
            install_path,
        })
    }
}
