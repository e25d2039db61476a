//! `sup publish <manifest> --registry <path>` — pack and store a package.

use std::path::Path;

use anyhow::{Context, Result};

use sup_registry::store::RegistryStore;

/// Run `sup publish` — validate, pack the manifest's directory, and write
/// artifact plus digest-stamped manifest into the registry.
///
/// # Errors
///
/// Returns an error if validation, packing, or the registry write fails.
pub fn run_publish(manifest_path: &Path, registry: &Path) -> Result<()> {
    let store = RegistryStore::open(registry);
    let stamped = store
        .publish(manifest_path)
        .with_context(|| format!("cannot publish '{}'", manifest_path.display()))?;

    // The digest is always stamped by a successful publish.
    let sha256 = stamped
        .sha256
        .as_ref()
        .map_or_else(String::new, ToString::to_string);
    println!(
        "published {}@{} to {} (sha256 {sha256})",
        stamped.name,
        stamped.version,
        registry.display()
    );
    Ok(())
}
