//! `sup list` — enumerate installed packages.

use anyhow::Result;

use sup_core::installed::InstallDb;

use crate::config::{db_path, sup_home};

/// Run `sup list` — print one line per installed package, sorted by name
/// then version. An empty store prints nothing.
///
/// # Errors
///
/// Returns an error if the install database cannot be read.
pub fn run_list() -> Result<()> {
    let mut db = InstallDb::load(&db_path(&sup_home()))?;
    db.packages
        .sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
    for pkg in &db.packages {
        println!(
            "{}@{}  {}",
            pkg.name,
            pkg.version,
            pkg.install_path.display()
        );
    }
    Ok(())
}
