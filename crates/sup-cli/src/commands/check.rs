//! `sup check <manifest>` — validate a package manifest.

use std::path::Path;

use anyhow::{Context, Result};

use sup_core::manifest::Manifest;

/// Run `sup check` — load the manifest and validate it as a source
/// manifest. Nothing is persisted.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any field fails
/// validation.
pub fn run_check(manifest_path: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("cannot load manifest '{}'", manifest_path.display()))?;
    manifest.validate_source()?;
    println!("ok: {}@{}", manifest.name, manifest.version);
    Ok(())
}
