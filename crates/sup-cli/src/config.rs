//! CLI configuration — `~/.sup/config.toml` and local store paths.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Persisted CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default registry path used when no `--registry` flag is given.
    pub registry: Option<PathBuf>,
}

/// Return the sup home directory: `$SUP_HOME`, else `~/.sup`.
#[must_use]
pub fn sup_home() -> PathBuf {
    if let Ok(home) = std::env::var("SUP_HOME") {
        return PathBuf::from(home);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_owned());
    PathBuf::from(home).join(".sup")
}

/// Path of the CLI config file inside `home`.
#[must_use]
pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

/// Path of the install database inside `home`.
#[must_use]
pub fn db_path(home: &Path) -> PathBuf {
    home.join("installed.json")
}

/// Root directory for unpacked packages inside `home`.
#[must_use]
pub fn packages_root(home: &Path) -> PathBuf {
    home.join("packages")
}

/// Write `cfg` to `path`, creating parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn save_config(cfg: &CliConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string(cfg)?)?;
    Ok(())
}

/// Load a [`CliConfig`] from `path`. A missing file is an empty config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or deserialized.
pub fn load_config(path: &Path) -> Result<CliConfig> {
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Resolve the registry to use: the `--registry` flag (or `REGISTRY`
/// environment variable, which clap folds into the flag), else the config
/// file default.
///
/// # Errors
///
/// Returns an error if neither the flag nor the config names a registry.
pub fn resolve_registry(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let cfg = load_config(&config_path(&sup_home()))?;
    cfg.registry.ok_or_else(|| {
        anyhow::anyhow!("no registry given: pass --registry or set one in config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = CliConfig {
            registry: Some(PathBuf::from("test_registry")),
        };
        save_config(&cfg, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.registry.unwrap(), PathBuf::from("test_registry"));
    }

    #[test]
    fn missing_config_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = load_config(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.registry.is_none());
    }
}
