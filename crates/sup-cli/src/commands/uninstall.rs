//! `sup uninstall <package>` — remove an installed package.

use anyhow::{bail, Context, Result};

use sup_core::installed::InstallDb;
use sup_core::package_ref::PackageRef;

use crate::config::{db_path, sup_home};

/// Run `sup uninstall` — delete the installed files and drop the install
/// record. An unpinned reference is only accepted when exactly one version
/// is installed.
///
/// # Errors
///
/// Returns an error if the package is not installed, the reference is
/// ambiguous, or the files cannot be removed.
pub fn run_uninstall(package: &str) -> Result<()> {
    let pkg_ref =
        PackageRef::parse(package).with_context(|| format!("invalid package '{package}'"))?;

    let db_file = db_path(&sup_home());
    let mut db = InstallDb::load(&db_file)?;

    let matching = db.matching(&pkg_ref);
    let (name, version) = match matching.as_slice() {
        [] => bail!("package '{pkg_ref}' is not installed"),
        [only] => (only.name.clone(), only.version.clone()),
        many => {
            let versions: Vec<String> = many.iter().map(|p| p.version.to_string()).collect();
            bail!(
                "'{pkg_ref}' is ambiguous: installed versions are {}; pin one with name@version",
                versions.join(", ")
            );
        }
    };

    let removed = db
        .remove(&name, &version)
        .with_context(|| format!("package '{name}@{version}' is not installed"))?;

    if removed.install_path.exists() {
        std::fs::remove_dir_all(&removed.install_path).with_context(|| {
            format!("cannot remove '{}'", removed.install_path.display())
        })?;
    }
    // Drop the per-package directory if this was its last version.
    if let Some(parent) = removed.install_path.parent() {
        let _ = std::fs::remove_dir(parent);
    }

    db.save(&db_file)?;
    println!("uninstalled {name}@{version}");
    Ok(())
}
