//! `sup index --registry <path>` — rebuild a registry's lookup index.

use std::path::Path;

use anyhow::{Context, Result};

use sup_registry::store::RegistryStore;

/// Run `sup index` — scan the registry tree and rewrite `index.json`.
///
/// # Errors
///
/// Returns an error if the scan finds a malformed entry or the index
/// cannot be written.
pub fn run_index(registry: &Path) -> Result<()> {
    let store = RegistryStore::open(registry);
    let index = store
        .rebuild_index()
        .with_context(|| format!("cannot index registry '{}'", registry.display()))?;
    println!(
        "indexed {} package version(s) in {}",
        index.len(),
        registry.display()
    );
    Ok(())
}
