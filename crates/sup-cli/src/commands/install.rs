//! `sup install <package>` — install a package by name from an indexed
//! registry.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use sup_core::package_ref::PackageRef;
use sup_registry::store::RegistryStore;

use crate::config::{resolve_registry, sup_home};
use crate::installer::Installer;

/// Run `sup install` — resolve the reference through the registry index,
/// install missing dependencies first, then the package itself.
///
/// # Errors
///
/// Returns an error if no registry is configured, the reference does not
/// resolve, or any install step fails.
pub fn run_install(package: &str, registry: Option<PathBuf>) -> Result<()> {
    let pkg_ref =
        PackageRef::parse(package).with_context(|| format!("invalid package '{package}'"))?;
    let registry = resolve_registry(registry)?;

    let store = Arc::new(RegistryStore::open(&registry));
    let installer = Installer::new(store, registry, sup_home());

    let installed = installer.install(&pkg_ref)?;
    if installed.is_empty() {
        println!("{pkg_ref} is already installed");
    }
    for pkg in &installed {
        println!(
            "installed {}@{} to {}",
            pkg.name,
            pkg.version,
            pkg.install_path.display()
        );
    }
    Ok(())
}
