//! `sup show <package>` — print metadata for an installed or available
//! package.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use sup_core::installed::InstallDb;
use sup_core::manifest::Manifest;
use sup_core::package_ref::PackageRef;
use sup_registry::store::RegistryStore;

use crate::config::{db_path, resolve_registry, sup_home};

/// Run `sup show` — look the package up in the install database, falling
/// back to the registry index for packages that are published but not
/// installed.
///
/// # Errors
///
/// Returns an error if the package is neither installed nor available.
pub fn run_show(package: &str, registry: Option<PathBuf>) -> Result<()> {
    let pkg_ref =
        PackageRef::parse(package).with_context(|| format!("invalid package '{package}'"))?;

    let db = InstallDb::load(&db_path(&sup_home()))?;
    let matching = db.matching(&pkg_ref);
    if let Some(pkg) = matching.iter().max_by_key(|p| p.version.clone()) {
        println!("package:     {}@{}", pkg.name, pkg.version);
        // The unpacked payload carries its source manifest; use it for the
        // fields the install record does not duplicate.
        let manifest_file = pkg.install_path.join(format!("{}.pkg.json", pkg.name));
        if let Ok(manifest) = Manifest::load(&manifest_file) {
            println!("description: {}", manifest.description);
            if let Some(license) = &manifest.license {
                println!("license:     {license}");
            }
            for (dep, req) in &manifest.depends {
                println!("depends:     {dep} {req}");
            }
        }
        println!("sha256:      {}", pkg.sha256);
        println!("registry:    {}", pkg.registry.display());
        println!("installed:   {}", pkg.install_path.display());
        return Ok(());
    }

    // Not installed; try the configured registry.
    let Ok(registry) = resolve_registry(registry) else {
        bail!("package '{pkg_ref}' is not installed");
    };
    let store = RegistryStore::open(&registry);
    let index = store
        .index()
        .with_context(|| format!("package '{pkg_ref}' is not installed"))?;
    let (version, entry) = index.resolve(&pkg_ref.name, pkg_ref.version.as_ref())?;

    println!("package:     {}@{version} (not installed)", pkg_ref.name);
    println!("description: {}", entry.description);
    println!("sha256:      {}", entry.sha256);
    for (dep, req) in &entry.depends {
        println!("depends:     {dep} {req}");
    }
    println!("registry:    {}", registry.display());
    Ok(())
}
